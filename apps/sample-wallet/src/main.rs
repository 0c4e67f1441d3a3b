fn main() -> anyhow::Result<()> {
    sample_wallet::run()
}
