//! Integration Tests für den Licht-Monitor
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Kollaborateure
//! für Sensor, Konsole und Anzeige.

use std::collections::VecDeque;

use light_core::{
    AlertDecision, AlertNotice, AlertState, CalibrationProgress, CommandInput, Connectivity,
    Console, CyclePhase, CycleReport, DisplayError, HeldReading, LightSensor, Monitor,
    MonitorConfig, SensorReader, StatusDisplay, StatusSnapshot, indicator_color,
    report_delivery,
};
use light_core::command::ENTRY_IDLE_POLLS;
use rgb::RGB8;

// ============================================================================
// Mocks
// ============================================================================

/// Sensor mit fester Wertefolge (wiederholt den letzten Wert)
#[derive(Default)]
pub struct MockSensor {
    pub values: VecDeque<i32>,
    pub last: i32,
    pub read_count: usize,
}

impl MockSensor {
    pub fn new(values: &[i32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl LightSensor for MockSensor {
    fn read_raw(&mut self) -> i32 {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.read_count += 1;
        self.last
    }
}

/// Konsolen-Eingabe aus einem Skript
#[derive(Default)]
pub struct ScriptedInput {
    pub pending: VecDeque<u8>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, text: &str) {
        self.pending.extend(text.bytes());
    }
}

impl CommandInput for ScriptedInput {
    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}

/// Konsolen-Ausgabe, sammelt alle Zeilen
#[derive(Default)]
pub struct RecordingConsole {
    pub lines: Vec<String>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Console for RecordingConsole {
    fn println(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// ADC-Sensor, dessen Wandlung ausbleiben kann (`None` im Skript)
pub struct FlakySensor {
    pub script: VecDeque<Option<i32>>,
    pub held: HeldReading,
}

impl FlakySensor {
    pub fn new(script: &[Option<i32>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            held: HeldReading::new(),
        }
    }
}

impl LightSensor for FlakySensor {
    fn read_raw(&mut self) -> i32 {
        let fresh = self.script.pop_front().flatten();
        self.held.resolve(fresh)
    }
}

#[derive(Default)]
pub struct MockDisplay {
    pub last_snapshot: Option<StatusSnapshot>,
    pub render_count: usize,
    pub fail_next_render: bool,
}

impl StatusDisplay for MockDisplay {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), DisplayError> {
        if self.fail_next_render {
            self.fail_next_render = false;
            return Err(DisplayError::RenderFailed);
        }
        self.last_snapshot = Some(*snapshot);
        self.render_count += 1;
        Ok(())
    }
}

const ONLINE: Connectivity = Connectivity::online([192, 168, 0, 10]);

struct Rig {
    monitor: Monitor,
    input: ScriptedInput,
    console: RecordingConsole,
}

impl Rig {
    fn new() -> Self {
        Self {
            monitor: Monitor::new(MonitorConfig::default()),
            input: ScriptedInput::new(),
            console: RecordingConsole::new(),
        }
    }

    fn cycle(&mut self, sample: u16, now_ms: u64) -> CycleReport {
        self.monitor
            .run_cycle(sample, now_ms, ONLINE, &mut self.input, &mut self.console)
    }
}

// ============================================================================
// Tests: Mocks
// ============================================================================

#[test]
fn test_mock_sensor_repeats_last_value() {
    let mut sensor = MockSensor::new(&[10, 20]);
    assert_eq!(sensor.read_raw(), 10);
    assert_eq!(sensor.read_raw(), 20);
    assert_eq!(sensor.read_raw(), 20);
    assert_eq!(sensor.read_count, 3);
}

#[test]
fn test_mock_display_fail() {
    let mut display = MockDisplay {
        fail_next_render: true,
        ..MockDisplay::default()
    };
    let snapshot = Monitor::new(MonitorConfig::default()).snapshot(0, ONLINE);

    assert_eq!(display.render(&snapshot), Err(DisplayError::RenderFailed));
    assert_eq!(display.render_count, 0);
    assert!(display.render(&snapshot).is_ok());
    assert_eq!(display.last_snapshot, Some(snapshot));
}

// ============================================================================
// Tests: Alarm-Zustandsmaschine über den Monitor
// ============================================================================

#[test]
fn test_at_or_above_threshold_never_alerts() {
    let mut rig = Rig::new();
    for (i, sample) in [2000u16, 2001, 4095].into_iter().enumerate() {
        let report = rig.cycle(sample, 100_000 * (i as u64 + 1));
        assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Clear));
        assert_eq!(report.notify, None);
        assert_eq!(rig.monitor.alert_state(), AlertState::Normal);
    }
}

#[test]
fn test_below_threshold_alerts_once_while_active() {
    let mut rig = Rig::new();
    assert!(rig.cycle(1999, 100).notify.is_some());

    // Weiterhin dunkel, auch nach Ablauf der Sperrzeit: kein Wiederholungsalarm
    let report = rig.cycle(1000, 500_000);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Holding));
    assert_eq!(report.notify, None);
}

#[test]
fn test_two_dips_within_cooldown_notify_once() {
    let mut rig = Rig::new();
    let mut notifications = 0;

    for (sample, now) in [(1500, 1_000), (2500, 10_000), (1500, 30_000), (2500, 40_000)] {
        if rig.cycle(sample, now).notify.is_some() {
            notifications += 1;
        }
    }

    assert_eq!(notifications, 1);
}

#[test]
fn test_second_dip_after_cooldown_notifies_again() {
    let mut rig = Rig::new();
    assert!(rig.cycle(1500, 1_000).notify.is_some());
    assert!(rig.cycle(2500, 2_000).notify.is_none());
    assert!(rig.cycle(1500, 61_001).notify.is_some());
    assert_eq!(rig.monitor.last_alert_ms(), Some(61_001));
}

#[test]
fn test_end_to_end_scenario() {
    let mut rig = Rig::new();

    let report = rig.cycle(1500, 100);
    assert_eq!(
        report.notify,
        Some(AlertNotice {
            sample: 1500,
            threshold: 2000,
            at_ms: 100
        })
    );
    assert_eq!(rig.monitor.alert_state(), AlertState::Active);
    assert_eq!(rig.monitor.last_alert_ms(), Some(100));

    let report = rig.cycle(2500, 50_000);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Recovered));
    assert_eq!(report.notify, None);
    assert_eq!(rig.monitor.alert_state(), AlertState::Normal);

    // 55000 - 100 = 54900 < 60000
    let report = rig.cycle(1000, 55_000);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Suppressed));
    assert_eq!(report.notify, None);
    assert_eq!(rig.monitor.alert_state(), AlertState::Normal);
    assert_eq!(rig.monitor.last_alert_ms(), Some(100));
}

#[test]
fn test_failed_delivery_still_commits_and_does_not_retry() {
    let mut rig = Rig::new();
    let report = rig.cycle(1500, 100);
    assert!(report.notify.is_some());

    let delivery = report_delivery(-1, &mut rig.console);
    assert!(!delivery.is_accepted());
    assert!(rig.console.contains("Notification failed (error -1)"));

    assert_eq!(rig.monitor.alert_state(), AlertState::Active);
    assert_eq!(rig.monitor.last_alert_ms(), Some(100));
    assert_eq!(rig.cycle(1500, 200).notify, None);
}

// ============================================================================
// Tests: Kalibrierung
// ============================================================================

#[test]
fn test_calibration_sets_mean_and_resets_alert() {
    let mut rig = Rig::new();
    rig.cycle(1500, 100);
    assert_eq!(rig.monitor.alert_state(), AlertState::Active);

    rig.input.feed("c\n");
    let mut last = None;
    for (i, sample) in (1..=10u16).map(|n| n * 100).enumerate() {
        let report = rig.cycle(sample, 1_000 + 500 * i as u64);
        last = Some(report.phase);
    }

    assert_eq!(
        last,
        Some(CyclePhase::Calibrating(CalibrationProgress::Complete { threshold: 550 }))
    );
    assert_eq!(rig.monitor.threshold(), 550);
    assert_eq!(rig.monitor.alert_state(), AlertState::Normal);
    assert!(!rig.monitor.is_calibrating());
    assert!(rig.console.contains("Starting calibration"));
    assert!(rig.console.contains("Calibration complete! New threshold: 550"));
}

#[test]
fn test_calibration_skips_alert_evaluation() {
    let mut rig = Rig::new();
    rig.input.feed("C");

    for i in 0..9u64 {
        let report = rig.cycle(10, 100_000 + i * 500);
        assert!(matches!(report.phase, CyclePhase::Calibrating(_)));
        assert_eq!(report.notify, None);
        assert_eq!(report.snapshot.calibration, Some(i as usize + 1));
    }
    assert_eq!(rig.monitor.last_alert_ms(), None);

    // Zehnter Wert schließt ab: Schwellwert 10, der nächste Zyklus wertet wieder aus
    rig.cycle(10, 105_000);
    assert_eq!(rig.monitor.threshold(), 10);
    let report = rig.cycle(5, 105_500);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Triggered));
}

#[test]
fn test_calibration_keeps_cooldown() {
    let mut rig = Rig::new();
    rig.cycle(1500, 100);

    rig.input.feed("c");
    for i in 0..10u64 {
        rig.cycle(3000, 1_000 + i * 500);
    }
    assert_eq!(rig.monitor.threshold(), 3000);

    // Unter dem neuen Schwellwert, aber innerhalb der Sperrzeit seit t=100
    let report = rig.cycle(2000, 20_000);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Suppressed));
}

// ============================================================================
// Tests: Manueller Schwellwert
// ============================================================================

#[test]
fn test_manual_threshold_out_of_range_rejected() {
    let mut rig = Rig::new();
    rig.input.feed("t\n5000\n");
    rig.cycle(2500, 100);

    assert_eq!(rig.monitor.threshold(), 2000);
    assert!(rig.console.contains("Invalid threshold 5000!"));
}

#[test]
fn test_manual_threshold_accepted_resets_alert() {
    let mut rig = Rig::new();
    rig.cycle(1500, 100);
    assert_eq!(rig.monitor.alert_state(), AlertState::Active);

    rig.input.feed("t\n3000\n");
    let report = rig.cycle(1500, 200);

    assert_eq!(rig.monitor.threshold(), 3000);
    // Reset auf NORMAL, danach sofortige Auswertung innerhalb der Sperrzeit
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Suppressed));
    assert_eq!(rig.monitor.alert_state(), AlertState::Normal);
    assert!(rig.console.contains("Threshold set to: 3000"));
}

#[test]
fn test_manual_threshold_non_numeric_rejected() {
    let mut rig = Rig::new();
    rig.input.feed("t\nbright\n");
    rig.cycle(2500, 100);
    assert_eq!(rig.monitor.threshold(), 2000);
    assert!(rig.console.contains("Invalid threshold!"));
}

#[test]
fn test_pending_entry_suspends_evaluation() {
    let mut rig = Rig::new();
    rig.input.feed("t\n");

    let report = rig.cycle(100, 1_000);
    assert_eq!(report.phase, CyclePhase::AwaitingInput);
    assert_eq!(report.notify, None);
    assert!(report.snapshot.awaiting_input);
    assert_eq!(rig.monitor.alert_state(), AlertState::Normal);

    rig.input.feed("1000\n");
    let report = rig.cycle(100, 1_500);
    assert_eq!(rig.monitor.threshold(), 1000);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Triggered));
}

#[test]
fn test_entry_without_line_ending_completes_after_idle_cycles() {
    let mut rig = Rig::new();
    rig.input.feed("t3000");

    let mut now_ms = 100;
    for _ in 0..ENTRY_IDLE_POLLS {
        let report = rig.cycle(100, now_ms);
        assert_eq!(report.phase, CyclePhase::AwaitingInput);
        now_ms += 500;
    }

    let report = rig.cycle(100, now_ms);
    assert_eq!(rig.monitor.threshold(), 3000);
    assert!(rig.console.contains("Threshold set to: 3000"));
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Triggered));
    assert_eq!(rig.monitor.last_alert_ms(), Some(now_ms));
}

#[test]
fn test_input_after_entry_is_drained() {
    let mut rig = Rig::new();
    rig.input.feed("t\n1234\nc\n");
    rig.cycle(2500, 100);
    assert_eq!(rig.monitor.threshold(), 1234);
    assert!(rig.input.pending.is_empty());

    rig.cycle(2500, 600);
    assert!(!rig.monitor.is_calibrating());
}

#[test]
fn test_missing_first_conversion_reads_bright() {
    let mut reader = SensorReader::new(FlakySensor::new(&[None, Some(1500), None]), 1);
    let mut rig = Rig::new();

    let sample = reader.read();
    assert_eq!(sample, 4095);
    let report = rig.cycle(sample, 100);
    assert_eq!(report.phase, CyclePhase::Monitoring(AlertDecision::Clear));
    assert_eq!(report.notify, None);

    assert_eq!(reader.read(), 1500);
    assert_eq!(reader.read(), 1500);
}

// ============================================================================
// Tests: Status
// ============================================================================

#[test]
fn test_status_queries_are_idempotent() {
    let mut rig = Rig::new();
    rig.cycle(1500, 100);

    let first = rig.monitor.snapshot(5_000, ONLINE);
    let second = rig.monitor.snapshot(5_000, ONLINE);
    assert_eq!(first, second);

    rig.input.feed("s\n");
    rig.monitor
        .run_cycle(1500, 5_000, ONLINE, &mut rig.input, &mut rig.console);
    rig.input.feed("s\n");
    rig.monitor
        .run_cycle(1500, 5_000, ONLINE, &mut rig.input, &mut rig.console);

    let reports: Vec<&String> = rig
        .console
        .lines
        .iter()
        .filter(|line| line.starts_with("--- Status ---"))
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0], reports[1]);
    assert!(reports[0].contains("Light level: 1500 / 4095"));
    assert!(reports[0].contains("Alert: ACTIVE"));
    assert!(reports[0].contains("IP: 192.168.0.10"));
    assert!(reports[0].contains("Last alert: 4s ago"));
}

#[test]
fn test_status_offline_hides_ip() {
    let mut rig = Rig::new();
    rig.input.feed("S");
    rig.monitor.run_cycle(
        2500,
        100,
        Connectivity::offline(),
        &mut rig.input,
        &mut rig.console,
    );
    assert!(rig.console.contains("WiFi: disconnected"));
    assert!(!rig.console.contains("IP:"));
}

#[test]
fn test_unknown_command_changes_nothing() {
    let mut rig = Rig::new();
    let before = rig.monitor.snapshot(100, ONLINE);
    rig.input.feed("x");
    rig.cycle(2500, 100);
    assert!(rig.console.contains("Unknown command"));
    assert_eq!(rig.monitor.threshold(), before.threshold);
    assert_eq!(rig.monitor.alert_state(), before.alert_state);
}

#[test]
fn test_snapshot_json() {
    let mut rig = Rig::new();
    let report = rig.cycle(1500, 100);

    let mut buf = [0u8; 512];
    let n = serde_json_core::to_slice(&report.snapshot, &mut buf).unwrap();
    let json = std::str::from_utf8(&buf[..n]).unwrap();

    assert!(json.contains("\"sample\":1500"));
    assert!(json.contains("\"threshold\":2000"));
    assert!(json.contains("\"alert_state\":\"active\""));
    assert!(json.contains("\"connected\":true"));
    assert!(json.contains("\"calibration\":null"));
}

// ============================================================================
// Tests: Kompletter Zyklus mit Sensor und Anzeige
// ============================================================================

#[test]
fn test_full_cycle_with_reader_and_display() {
    let mut reader = SensorReader::new(MockSensor::new(&[1400, 1500, 1600, 9000]), 3);
    let mut display = MockDisplay::default();
    let mut rig = Rig::new();

    let sample = reader.read();
    assert_eq!(sample, 1500);
    let report = rig.cycle(sample, 100);
    display.render(&report.snapshot).unwrap();

    let shown = display.last_snapshot.unwrap();
    assert_eq!(shown.alert_state, AlertState::Active);
    assert_eq!(indicator_color(&shown, 10), RGB8 { r: 10, g: 0, b: 0 });

    // Nur noch 9000 im Sensor → auf 4095 geklemmt
    let sample = reader.read();
    assert_eq!(sample, 4095);
    let report = rig.cycle(sample, 600);
    display.render(&report.snapshot).unwrap();
    assert_eq!(display.render_count, 2);
    assert_eq!(
        indicator_color(&display.last_snapshot.unwrap(), 10),
        RGB8 { r: 0, g: 10, b: 0 }
    );
}
