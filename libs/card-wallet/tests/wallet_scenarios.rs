//! End-to-end behavior of the wallet stack.

mod common;

use pretty_assertions::assert_eq;

use card_wallet::{Card, Timeline, Wallet, WalletAction, WalletConfig};
use common::{demo_deck, numbered_cards, swipe, ActionLog};

fn interactive(cards: &[Card]) -> Vec<Card> {
    cards.iter().filter(|card| card.is_interactive()).cloned().collect()
}

/// Wallet over [A, B, C, D] with the default window.
fn abcd() -> (Timeline, Vec<Card>, Wallet, ActionLog) {
    let timeline = Timeline::new();
    let deck = demo_deck(&timeline);
    let wallet = Wallet::with_cards(&timeline, deck.clone());
    let log = ActionLog::attach(&wallet);
    (timeline, deck, wallet, log)
}

#[test]
fn test_four_cards_fit_in_default_window() {
    let (_timeline, deck, wallet, log) = abcd();

    assert_eq!(wallet.visible_cards(), deck);
    assert_eq!(interactive(&deck), vec![deck[3].clone()]);
    assert_eq!(wallet.selected_card(), Some(deck[3].clone()));
    assert_eq!(wallet.draw_order().last(), Some(&deck[3]));
    assert!(deck[..3].iter().all(|card| card.z_position() < deck[3].z_position()));
    assert!(log.is_empty());
}

#[test]
fn test_removing_front_card_promotes_previous_one() {
    let (timeline, deck, wallet, log) = abcd();

    wallet.remove(&deck[3]);
    assert_eq!(wallet.len(), 4);
    assert!(log.is_empty());

    timeline.run_until_idle();
    assert_eq!(wallet.cards(), deck[..3].to_vec());
    assert_eq!(log.take(), vec![WalletAction::InFront(deck[2].clone())]);
    assert!(deck[2].is_interactive());
    assert_eq!(interactive(&wallet.cards()), vec![deck[2].clone()]);
}

#[test]
fn test_removing_twice_is_idempotent() {
    let (timeline, deck, wallet, log) = abcd();

    wallet.remove(&deck[3]);
    wallet.remove(&deck[3]);
    timeline.run_until_idle();
    assert_eq!(wallet.cards(), deck[..3].to_vec());
    assert_eq!(log.take(), vec![WalletAction::InFront(deck[2].clone())]);

    wallet.remove(&deck[3]);
    timeline.run_until_idle();
    assert_eq!(wallet.cards(), deck[..3].to_vec());
    assert!(log.is_empty());
}

#[test]
fn test_swiping_front_card_sends_it_to_the_back() {
    let (timeline, deck, wallet, log) = abcd();
    let [a, b, c, d] = [&deck[0], &deck[1], &deck[2], &deck[3]];

    swipe(d, 250.0);
    assert!(!d.is_interactive());
    assert_eq!(wallet.cards(), deck);

    timeline.run_until_idle();
    assert_eq!(
        wallet.cards(),
        vec![d.clone(), a.clone(), b.clone(), c.clone()]
    );
    assert_eq!(wallet.selected_card(), Some(c.clone()));
    assert_eq!(log.take(), vec![WalletAction::InFront(c.clone())]);
    assert!(c.is_interactive());
    assert_eq!(d.z_position(), 0.0);
}

#[test]
fn test_upward_flick_also_swaps() {
    let (timeline, deck, wallet, log) = abcd();

    swipe(&deck[3], -80.0);
    timeline.run_until_idle();

    assert_eq!(wallet.cards()[0], deck[3]);
    assert_eq!(log.take(), vec![WalletAction::InFront(deck[2].clone())]);
}

#[test]
fn test_short_drag_leaves_stack_alone() {
    let (timeline, deck, wallet, log) = abcd();
    let before = deck[3].frame();

    swipe(&deck[3], 120.0);
    timeline.run_until_idle();

    assert_eq!(wallet.cards(), deck);
    assert_eq!(deck[3].frame(), before);
    assert!(log.is_empty());
}

#[test]
fn test_only_front_card_reacts_to_swipes() {
    let (timeline, deck, wallet, log) = abcd();

    swipe(&deck[1], 300.0);
    timeline.run_until_idle();

    assert_eq!(wallet.cards(), deck);
    assert!(log.is_empty());
}

#[test]
fn test_repeated_swaps_cycle_through_the_stack() {
    let (timeline, deck, wallet, log) = abcd();

    for _ in 0..4 {
        let front = wallet.selected_card().unwrap();
        swipe(&front, 250.0);
        timeline.run_until_idle();
    }

    assert_eq!(wallet.cards(), deck);
    let fronts: Vec<Card> = log.take().iter().map(|action| action.card().clone()).collect();
    assert_eq!(
        fronts,
        vec![deck[2].clone(), deck[1].clone(), deck[0].clone(), deck[3].clone()]
    );
}

#[test]
fn test_window_of_two_hides_the_three_oldest() {
    let timeline = Timeline::new();
    let cards = numbered_cards(&timeline, 5);
    let config = WalletConfig::default().with_max_showable_cards(2);
    let wallet = Wallet::new(&timeline, cards.clone(), config).unwrap();

    let hidden: Vec<Card> = cards.iter().filter(|card| card.is_hidden()).cloned().collect();
    assert_eq!(hidden, cards[..3].to_vec());
    assert_eq!(wallet.visible_cards(), cards[3..].to_vec());
    assert_eq!(interactive(&cards), vec![cards[4].clone()]);
}

#[test]
fn test_swap_reveals_hidden_card() {
    let timeline = Timeline::new();
    let cards = numbered_cards(&timeline, 5);
    let config = WalletConfig::default().with_max_showable_cards(2);
    let wallet = Wallet::new(&timeline, cards.clone(), config).unwrap();

    swipe(&cards[4], 250.0);
    timeline.run_until_idle();

    assert!(cards[4].is_hidden());
    assert_eq!(wallet.visible_cards(), vec![cards[2].clone(), cards[3].clone()]);
}

#[test]
fn test_most_recent_add_is_selected() {
    let timeline = Timeline::new();
    let wallet = Wallet::with_cards(&timeline, Vec::new());
    let log = ActionLog::attach(&wallet);
    assert_eq!(wallet.selected_card(), None);

    for card in numbered_cards(&timeline, 8) {
        wallet.add(card.clone());
        assert_eq!(wallet.selected_card(), Some(card.clone()));
        assert_eq!(log.take(), vec![WalletAction::InFront(card)]);
        timeline.advance(std::time::Duration::from_millis(100));
    }
    timeline.run_until_idle();
    assert_eq!(wallet.len(), 8);
}

#[test]
fn test_layout_invariants_hold_for_every_window() {
    for count in 1..=9 {
        for window in 1..=6 {
            let timeline = Timeline::new();
            let cards = numbered_cards(&timeline, count);
            let config = WalletConfig::default().with_max_showable_cards(window);
            let wallet = Wallet::new(&timeline, cards.clone(), config).unwrap();

            let dropped = count.saturating_sub(window);
            let visible = wallet.visible_cards();
            assert_eq!(visible, cards[dropped..].to_vec(), "count {count} window {window}");
            assert!(cards[..dropped].iter().all(Card::is_hidden));

            assert_eq!(interactive(&cards), vec![visible[visible.len() - 1].clone()]);

            let depths: Vec<f64> = visible.iter().map(Card::z_position).collect();
            assert!(depths.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}

#[test]
fn test_in_front_is_sent_after_layout() {
    let (timeline, deck, wallet, _log) = abcd();
    let checks = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let probe = wallet.clone();
        let checks = std::rc::Rc::clone(&checks);
        wallet.subscribe(move |action| {
            if let WalletAction::InFront(card) = action {
                checks.borrow_mut().push(
                    probe.selected_card().as_ref() == Some(card) && card.is_interactive(),
                );
            }
        });
    }

    swipe(&deck[3], 250.0);
    timeline.run_until_idle();
    wallet.remove(&deck[2]);
    timeline.run_until_idle();

    assert_eq!(*checks.borrow(), vec![true, true]);
}

#[test]
fn test_removing_unknown_card_is_silent() {
    let (timeline, deck, wallet, log) = abcd();
    let stranger = numbered_cards(&timeline, 1).remove(0);

    wallet.remove(&stranger);
    timeline.run_until_idle();

    assert_eq!(wallet.cards(), deck);
    assert!(log.is_empty());
}
