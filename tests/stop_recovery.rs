mod common;

use common::{engine, engine_with, feed, status};
use driveboard::engine::Config;
use driveboard::hal::Planner;
use driveboard::protocol::ControlChar;
use driveboard::{Command, Parameter, Program, StopCode};

#[test]
fn fifth_data_byte_stops_and_later_input_is_ignored() {
    let mut engine = engine();
    feed(&mut engine, &[200, 200, 200, 200, 200]);
    assert_eq!(engine.planner().stop_code(), Some(StopCode::InvalidData));

    feed(&mut engine, &Program::new().line(1.0, 1.0, 0.0).finish());
    assert!(engine.planner().submitted().is_empty());
    assert!(engine.buffer().is_empty());

    let report = status(&mut engine);
    assert_eq!(report.stops, vec![StopCode::InvalidData]);
    assert!(!report.idle);
}

#[test]
fn short_payload_before_parameter_stops() {
    let mut engine = engine();
    feed(&mut engine, &[130, 131, 132, b'x']);
    assert_eq!(engine.planner().stop_code(), Some(StopCode::InvalidData));
    assert_eq!(engine.state().target, Config::default().origin_offset);
}

#[test]
fn stop_resynchronizes_target_with_the_head() {
    let mut engine = engine();
    engine.planner_mut().set_stalled(true);
    feed(
        &mut engine,
        &Program::new()
            .line(10.0, 10.0, 0.0)
            .line(30.0, 10.0, 0.0)
            .raw(&[150, 150])
            .finish(),
    );
    assert_eq!(engine.planner().queued(), 2);
    assert_eq!(engine.buffer().len(), 2);

    engine.planner().jog_to([12.0, 9.0, 0.0]);
    engine.planner().stop_signal().raise(StopCode::LimitHitX2);
    engine.idle();

    assert_eq!(engine.planner().queued(), 0);
    assert_eq!(engine.planner().planned_position(), [12.0, 9.0, 0.0]);
    assert_eq!(engine.state().target, [12.0, 9.0, 0.0]);
    assert!(engine.buffer().is_empty());

    // recovery is idempotent while the stop holds
    let resets = engine.planner().queue_resets();
    engine.idle();
    engine.idle();
    assert_eq!(engine.planner().queue_resets(), resets + 2);
    assert_eq!(engine.state().target, [12.0, 9.0, 0.0]);
}

#[test]
fn resume_restores_processing() {
    let mut engine = engine();
    feed(&mut engine, b"?");
    assert_eq!(engine.planner().stop_code(), Some(StopCode::InvalidMarker));

    feed(&mut engine, &[ControlChar::Resume.as_u8()]);
    assert!(engine.planner().stop_code().is_none());

    // target was resynchronized to the head, which never moved
    feed(&mut engine, &Program::new().command(Command::Line).finish());
    assert_eq!(engine.planner().submitted().len(), 1);
    assert_eq!(engine.state().target, Config::default().origin_offset);
}

#[test]
fn engine_resume_clears_the_stop() {
    let mut engine = engine();
    feed(&mut engine, &[200, 200, b'f']);
    assert_eq!(engine.planner().stop_code(), Some(StopCode::InvalidData));

    engine.resume();
    engine.idle();
    feed(&mut engine, &Program::new().param(Parameter::Feedrate, 900.0).finish());
    assert!(engine.planner().stop_code().is_none());
    assert_eq!(engine.state().feedrate, 900.0);
}

#[test]
fn host_stop_request_halts_the_stream() {
    let mut engine = engine();
    let job = Program::new()
        .line(1.0, 0.0, 0.0)
        .control(ControlChar::Stop)
        .line(2.0, 0.0, 0.0)
        .finish();
    feed(&mut engine, &job);

    // the link handles the stop on arrival, before the engine reads anything
    assert_eq!(
        engine.planner().stop_code(),
        Some(StopCode::SerialStopRequest)
    );
    assert!(engine.planner().submitted().is_empty());
}

#[test]
fn stop_during_drain_abandons_relative_offset() {
    let mut engine = engine();
    engine.planner_mut().set_stalled(true);
    feed(
        &mut engine,
        &Program::new()
            .line(20.0, 0.0, 0.0)
            .param(Parameter::OffsetX, 2.0)
            .command(Command::RefRelative)
            .finish(),
    );
    engine.planner().fault_after(3, StopCode::LimitHitX1);

    feed(&mut engine, &Program::new().param(Parameter::OffsetX, 1.0).finish());

    assert_eq!(engine.planner().stop_code(), Some(StopCode::LimitHitX1));
    assert_eq!(engine.state().offset[0], 2.0, "offset untouched");
    assert_eq!(engine.planner().queued(), 0);
    assert_eq!(engine.state().target, Config::default().origin_offset);
}

#[test]
fn interlock_forces_laser_off_every_pass() {
    let mut engine = engine();
    engine.board_mut().door_open = true;
    engine.idle();
    engine.idle();
    assert_eq!(engine.board().laser_cutoffs(), 2);

    engine.board_mut().door_open = false;
    engine.board_mut().cooling_off = true;
    engine.idle();
    assert_eq!(engine.board().laser_cutoffs(), 3);

    let report = status(&mut engine);
    assert!(report.chiller_off);
    assert!(!report.door_open);
}

#[test]
fn interlock_cutoff_is_configurable() {
    let mut engine = engine_with(Config {
        interlocks: false,
        ..Config::default()
    });
    engine.board_mut().door_open = true;
    engine.idle();
    assert_eq!(engine.board().laser_cutoffs(), 0);

    // the flag is still reported
    assert!(status(&mut engine).door_open);
}
