// Test the hotkey-driven session state machine without a live audio device.
// The model mirrors SessionController's transitions, driven by the same
// SessionState predicates, and records which cues would have played.

use winthrop::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    Start,
    Busy,
    Complete,
}

#[derive(Debug)]
struct SessionModel {
    state: SessionState,
    cues: Vec<Cue>,
    captures_started: usize,
    captures_submitted: usize,
    unbind_count: usize,
}

impl SessionModel {
    fn new() -> Self {
        SessionModel {
            state: SessionState::Idle,
            cues: Vec::new(),
            captures_started: 0,
            captures_submitted: 0,
            unbind_count: 0,
        }
    }

    fn start_hotkey(&mut self) {
        if !self.state.can_start() {
            self.cues.push(Cue::Busy);
            return;
        }
        self.cues.push(Cue::Start);
        self.captures_started += 1;
        self.state = SessionState::Recording;
    }

    /// Stop with a take of the given size. An empty take still closes the
    /// session but is not handed to the pipeline
    fn stop_hotkey(&mut self, take_chunks: usize) {
        if !self.state.can_stop() {
            return;
        }
        self.state = SessionState::Idle;
        if take_chunks > 0 {
            self.captures_submitted += 1;
        }
    }

    /// The background chain finishing plays the completion cue but does not
    /// touch the controller's state
    fn pipeline_complete(&mut self) {
        self.cues.push(Cue::Complete);
    }

    fn quit_hotkey(&mut self) {
        self.state = SessionState::ShuttingDown;
        self.unbind_count += 1;
    }
}

#[test]
fn start_stop_runs_one_session() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    assert_eq!(model.state, SessionState::Recording);

    model.stop_hotkey(4);
    assert_eq!(model.state, SessionState::Idle);
    assert_eq!(model.captures_submitted, 1);
    assert_eq!(model.cues, vec![Cue::Start]);
}

#[test]
fn start_while_recording_is_busy_signal_only() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    assert_eq!(model.state, SessionState::Recording);

    // Second start must not open a second capture or change state
    model.start_hotkey();
    assert_eq!(model.state, SessionState::Recording);
    assert_eq!(model.captures_started, 1);
    assert_eq!(model.cues, vec![Cue::Start, Cue::Busy]);
}

#[test]
fn repeated_busy_starts_stay_recording() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    for _ in 0..5 {
        model.start_hotkey();
    }

    assert_eq!(model.state, SessionState::Recording);
    assert_eq!(model.captures_started, 1);
    assert_eq!(model.cues.iter().filter(|&&c| c == Cue::Busy).count(), 5);
}

#[test]
fn empty_take_returns_idle_without_submitting() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    model.stop_hotkey(0);

    // Nothing captured - the session closes but no pipeline job is created
    assert_eq!(model.state, SessionState::Idle);
    assert_eq!(model.captures_submitted, 0);

    // A fresh session afterwards works normally
    model.start_hotkey();
    model.stop_hotkey(4);
    assert_eq!(model.captures_submitted, 1);
}

#[test]
fn stop_while_idle_is_ignored() {
    let mut model = SessionModel::new();

    model.stop_hotkey(4);
    assert_eq!(model.state, SessionState::Idle);
    assert_eq!(model.captures_submitted, 0);
    assert!(model.cues.is_empty());
}

#[test]
fn quit_from_idle_shuts_down() {
    let mut model = SessionModel::new();

    model.quit_hotkey();
    assert_eq!(model.state, SessionState::ShuttingDown);
    assert_eq!(model.unbind_count, 1);
}

#[test]
fn quit_while_recording_shuts_down() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    model.quit_hotkey();

    assert_eq!(model.state, SessionState::ShuttingDown);
    assert_eq!(model.unbind_count, 1);
}

#[test]
fn nothing_starts_after_shutdown() {
    let mut model = SessionModel::new();

    model.quit_hotkey();
    model.start_hotkey();

    // ShuttingDown cannot start; the start reads as busy and no capture opens
    assert_eq!(model.state, SessionState::ShuttingDown);
    assert_eq!(model.captures_started, 0);
}

#[test]
fn pipeline_tail_completes_after_state_returns_to_idle() {
    let mut model = SessionModel::new();

    model.start_hotkey();
    model.stop_hotkey(4);
    assert_eq!(model.state, SessionState::Idle);

    // The transcribe→route→clipboard chain finishes later, on its own thread
    model.pipeline_complete();
    assert_eq!(model.state, SessionState::Idle);
    assert_eq!(*model.cues.last().unwrap(), Cue::Complete);
}
