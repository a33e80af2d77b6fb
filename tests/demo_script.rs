use atm_core::SessionController;
use atm_core::config::AppConfig;
use atm_core::script::{StepOutcome, parse_script, run};

fn failure_code(outcome: &StepOutcome) -> Option<&'static str> {
    match outcome {
        StepOutcome::Failed { code, .. } => Some(code),
        _ => None,
    }
}

#[test]
fn demo_session_shows_each_failure_once() {
    let config = AppConfig::load("dev").unwrap();
    let text = std::fs::read_to_string("demos/session.txt").unwrap();
    let script = parse_script(&text).unwrap();

    let mut directory = config.build_directory().unwrap();
    let reports = {
        let mut atm = SessionController::with_limits(&mut directory, config.terminal);
        run(&mut atm, &script)
    };

    let codes: Vec<&str> = reports
        .iter()
        .filter_map(|r| failure_code(&r.outcome))
        .collect();
    assert_eq!(
        codes,
        vec![
            "INVALID_PIN",
            "INSUFFICIENT_FUNDS",
            "WITHDRAWAL_LIMIT_EXCEEDED",
            "INVALID_AMOUNT",
        ]
    );

    // Second session sees the balance left by the first
    let last_balance = reports
        .iter()
        .rev()
        .find_map(|r| match r.outcome {
            StepOutcome::Balance { balance } => Some(balance),
            _ => None,
        });
    assert_eq!(last_balance, Some(80));
    assert_eq!(
        directory.get_account("4111111111111111").unwrap().balance(),
        80
    );
}
