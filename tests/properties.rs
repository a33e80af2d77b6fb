use atm_core::{Account, AccountDirectory, AtmError, Card, SessionController, SessionState};
use proptest::prelude::*;

const CARD: &str = "4111111111111111";

#[derive(Debug, Clone)]
enum Op {
    Deposit(i64),
    Withdraw(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i64..10_000).prop_map(Op::Deposit),
        (-50i64..10_000).prop_map(Op::Withdraw),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Insert,
    Pin(bool),
    Select,
    Balance,
    Deposit(i64),
    Withdraw(i64),
    Eject,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Insert),
        any::<bool>().prop_map(Action::Pin),
        Just(Action::Select),
        Just(Action::Balance),
        (-10i64..500).prop_map(Action::Deposit),
        (-10i64..500).prop_map(Action::Withdraw),
        Just(Action::Eject),
    ]
}

/// Append a Luhn check digit to 15 payload digits
fn with_check_digit(payload: &[u8]) -> String {
    let mut digits: Vec<u32> = payload.iter().map(|d| u32::from(*d)).collect();
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            // After appending the check digit these positions become odd (doubled)
            if i % 2 == 0 {
                let x = d * 2;
                if x > 9 { x - 9 } else { x }
            } else {
                d
            }
        })
        .sum();
    digits.push((10 - sum % 10) % 10);
    digits
        .iter()
        .map(|d| char::from_digit(*d, 10).unwrap_or('0'))
        .collect()
}

proptest! {
    #[test]
    fn balance_equals_initial_plus_deposits_minus_withdrawals(
        initial in 0i64..100_000,
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let mut account = Account::new("p", initial).unwrap();
        let mut expected = initial;

        for op in ops {
            match op {
                Op::Deposit(n) => {
                    if let Ok(b) = account.deposit(n) {
                        expected += n;
                        prop_assert_eq!(b, expected);
                    }
                }
                Op::Withdraw(n) => {
                    let before = account.balance();
                    match account.withdraw(n) {
                        Ok(b) => {
                            prop_assert!(n <= before);
                            expected -= n;
                            prop_assert_eq!(b, expected);
                        }
                        Err(_) => prop_assert_eq!(account.balance(), before),
                    }
                }
            }
            prop_assert!(account.balance() >= 0);
            prop_assert_eq!(account.balance(), expected);
        }
    }

    #[test]
    fn withdraw_above_balance_never_succeeds(balance in 0i64..10_000, extra in 1i64..10_000) {
        let mut account = Account::new("p", balance).unwrap();
        let amount = balance + extra;
        for _ in 0..3 {
            prop_assert_eq!(
                account.withdraw(amount),
                Err(AtmError::InsufficientFunds { requested: amount, available: balance })
            );
            prop_assert_eq!(account.balance(), balance);
        }
    }

    #[test]
    fn enter_pin_succeeds_iff_exact_match(registered in "[0-9]{4,6}", entered in "[0-9 ]{0,7}") {
        let mut bank = AccountDirectory::new();
        bank.register(CARD, &registered, 0).unwrap();
        let card = Card::new(CARD).unwrap();

        let mut atm = SessionController::new(&mut bank);
        atm.insert_card(&card).unwrap();
        let result = atm.enter_pin(&entered);
        prop_assert_eq!(result.is_ok(), entered == registered);
        prop_assert_eq!(atm.is_authenticated(), entered == registered);
    }

    #[test]
    fn session_invariant_holds_between_calls(actions in prop::collection::vec(action(), 0..48)) {
        let mut bank = AccountDirectory::new();
        bank.register(CARD, "1234", 1_000).unwrap();
        let card = Card::new(CARD).unwrap();
        let mut atm = SessionController::new(&mut bank);

        for action in actions {
            let _ = match action {
                Action::Insert => atm.insert_card(&card),
                Action::Pin(true) => atm.enter_pin("1234"),
                Action::Pin(false) => atm.enter_pin("0000"),
                Action::Select => atm.select_account().map(|_| ()),
                Action::Balance => atm.view_balance().map(|_| ()),
                Action::Deposit(n) => atm.deposit(n).map(|_| ()),
                Action::Withdraw(n) => atm.withdraw(n).map(|_| ()),
                Action::Eject => {
                    atm.eject_card();
                    prop_assert_eq!(atm.view_balance(), Err(AtmError::NoAccountSelected));
                    Ok(())
                }
            };

            // bound account iff authenticated; authenticated implies a card
            prop_assert_eq!(atm.bound_account_id().is_some(), atm.is_authenticated());
            if atm.is_authenticated() {
                prop_assert!(atm.inserted_card().is_some());
            }
            prop_assert_eq!(
                atm.state() == SessionState::Idle,
                atm.inserted_card().is_none()
            );
            prop_assert!(atm.directory().get_account(CARD).unwrap().balance() >= 0);
        }
    }

    #[test]
    fn masked_number_keeps_last_four(payload in prop::collection::vec(0u8..10, 15)) {
        let number = with_check_digit(&payload);
        let card = Card::new(&number).unwrap();
        let masked = card.masked_number();

        prop_assert_eq!(card.number(), number.as_str());
        prop_assert!(masked.starts_with("****-****-****-"));
        prop_assert_eq!(&masked[15..], &number[12..]);
        prop_assert_eq!(masked.chars().filter(|c| *c == '*').count(), 12);
    }
}
