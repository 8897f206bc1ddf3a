use sigan::app::Action;
use sigan::commands::Session;
use sigan::config::Config;
use tempfile::{TempDir, tempdir};

fn config_in(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.state.state_dir_override = Some(dir.path().to_path_buf());
    config
}

fn calculate(session: &mut Session, room: &str, time: &str) {
    session
        .dispatch_all([
            Action::SetRoom(room.to_string()),
            Action::SetTimeInput(time.to_string()),
            Action::Calculate,
        ])
        .unwrap();
}

#[test]
fn test_overlapping_sessions_keep_both_records() {
    let dir = tempdir().unwrap();
    let config = config_in(&dir);

    let mut a = Session::open(&config).unwrap();
    let mut b = Session::open(&config).unwrap();

    calculate(&mut a, "A", "900");
    calculate(&mut b, "B", "1015");

    // b saw a's record when it saved
    let rooms: Vec<_> = b.state().history.iter().map(|r| r.room_number.as_str()).collect();
    assert_eq!(rooms, ["B", "A"]);

    let reopened = Session::open(&config).unwrap();
    assert_eq!(reopened.state().history.len(), 2);
    let rooms: Vec<_> = reopened
        .state()
        .history
        .iter()
        .map(|r| r.room_number.as_str())
        .collect();
    assert_eq!(rooms, ["B", "A"]);
}

#[test]
fn test_overlapping_sessions_keep_both_end_records() {
    let dir = tempdir().unwrap();
    let config = config_in(&dir);

    let mut a = Session::open(&config).unwrap();
    let mut b = Session::open(&config).unwrap();

    for (session, start, end) in [(&mut a, "700", "810"), (&mut b, "800", "900")] {
        session
            .dispatch_all([
                Action::SetStartInput(start.to_string()),
                Action::SetEndInput(end.to_string()),
                Action::CalculateDuration,
            ])
            .unwrap();
    }

    let reopened = Session::open(&config).unwrap();
    assert_eq!(reopened.state().end_history.len(), 2);
}

#[test]
fn test_failed_calculation_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_in(&dir);

    let mut session = Session::open(&config).unwrap();
    session.dispatch(Action::SetRoom("A".to_string())).unwrap();
    session.dispatch(Action::SetTimeInput("975".to_string())).unwrap();
    assert!(session.dispatch(Action::Calculate).is_err());

    assert!(Session::open(&config).unwrap().state().history.is_empty());
}
