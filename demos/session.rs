//! Simulated driveboard session: stream a small job, then query the board

use driveboard::engine::{Config, Engine};
use driveboard::protocol::ControlChar;
use driveboard::sim::{SimBoard, SimLink, SimPlanner};
use driveboard::{Command, Parameter, Program, StatusReport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Driveboard Session Example");
    println!("==========================\n");

    let config = Config::default();
    let planner = SimPlanner::new(config.origin_offset);
    let stop = planner.stop_signal();
    let mut engine = Engine::new(config, planner, SimLink::new(32), SimBoard::new());
    let requests = engine.requests();
    engine.link_mut().attach(requests, stop);

    // boot telegram
    engine.idle();
    print_telegrams("boot", &engine.link_mut().take_output())?;

    // a square with air assist
    let job = Program::new()
        .param(Parameter::Feedrate, 3000.0)
        .param(Parameter::Intensity, 180.0)
        .command(Command::AirEnable)
        .line(0.0, 0.0, 0.0)
        .line(20.0, 0.0, 0.0)
        .line(20.0, 20.0, 0.0)
        .line(0.0, 20.0, 0.0)
        .line(0.0, 0.0, 0.0)
        .command(Command::AirDisable)
        .finish();
    println!("Streaming {} bytes", job.len());

    engine.link_mut().receive(&job);
    while engine.poll() {}
    println!("Planner accepted {} blocks", engine.planner().submitted().len());

    // the link acts on control characters on arrival, so ask once the job is in
    engine.link_mut().receive(&[ControlChar::Superstatus.as_u8()]);
    engine.poll();
    print_telegrams("after job", &engine.link_mut().take_output())?;

    // malformed input halts the board until the host resumes
    engine.link_mut().receive(b"?");
    while engine.poll() {}
    engine.link_mut().receive(&[ControlChar::Status.as_u8()]);
    engine.poll();
    print_telegrams("after bad marker", &engine.link_mut().take_output())?;

    engine.link_mut().receive(&[ControlChar::Resume.as_u8(), ControlChar::Status.as_u8()]);
    engine.poll();
    print_telegrams("after resume", &engine.link_mut().take_output())?;

    let metrics = driveboard::metrics();
    println!(
        "\nBytes processed: {}, errors: {}, telegrams: {}",
        metrics.bytes_processed,
        metrics.protocol_errors,
        metrics.status_reports + metrics.superstatus_reports
    );

    Ok(())
}

fn print_telegrams(label: &str, mut bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    while !bytes.is_empty() {
        let (report, used) = StatusReport::parse(bytes)?;
        println!(
            "[{label}] idle={} stops={:?} position={:?}",
            report.idle, report.stops, report.position
        );
        if let Some(extended) = &report.superstatus {
            println!(
                "[{label}]   version={} feedrate={} intensity={}",
                extended.version, extended.feedrate, extended.intensity
            );
        }
        bytes = &bytes[used..];
    }
    Ok(())
}
