#![allow(dead_code)]

use driveboard::engine::{Config, Engine};
use driveboard::sim::{SimBoard, SimLink, SimPlanner};
use driveboard::StatusReport;

pub type SimEngine = Engine<SimPlanner, SimLink, SimBoard>;

/// Engine wired to simulated collaborators, with the startup telegram flushed.
pub fn engine_with(config: Config) -> SimEngine {
    engine_with_link(config, SimLink::new(256))
}

pub fn engine_with_link(config: Config, link: SimLink) -> SimEngine {
    let planner = SimPlanner::new(config.origin_offset);
    let stop = planner.stop_signal();
    let mut engine = Engine::new(config, planner, link, SimBoard::new());
    let requests = engine.requests();
    engine.link_mut().attach(requests, stop);
    engine.idle();
    engine.link_mut().take_output();
    engine
}

pub fn engine() -> SimEngine {
    engine_with(Config::default())
}

/// Deliver host bytes and process until the link runs dry.
pub fn feed(engine: &mut SimEngine, bytes: &[u8]) {
    engine.link_mut().receive(bytes);
    while engine.poll() {}
}

/// Request a status telegram and return the raw bytes.
pub fn status_bytes(engine: &mut SimEngine) -> Vec<u8> {
    engine.requests().request_status();
    engine.idle();
    engine.link_mut().take_output()
}

/// Request a status telegram and parse it.
pub fn status(engine: &mut SimEngine) -> StatusReport {
    let bytes = status_bytes(engine);
    let (report, used) = StatusReport::parse(&bytes).expect("valid telegram");
    assert_eq!(used, bytes.len(), "exactly one telegram");
    report
}

/// Request a superstatus telegram and parse it.
pub fn superstatus(engine: &mut SimEngine) -> StatusReport {
    engine.requests().request_superstatus();
    engine.idle();
    let bytes = engine.link_mut().take_output();
    StatusReport::parse(&bytes).expect("valid telegram").0
}
