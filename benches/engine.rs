use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use driveboard::engine::{Config, Engine};
use driveboard::sim::{SimBoard, SimLink, SimPlanner};
use driveboard::{Command, Parameter, Program};

fn raster_job(rows: u32) -> Vec<u8> {
    let mut program = Program::new()
        .param(Parameter::Feedrate, 6000.0)
        .param(Parameter::PixelWidth, 0.1);
    for row in 0..rows {
        let y = f64::from(row) * 0.1;
        program = program
            .param(Parameter::Intensity, f64::from(row % 256))
            .param(Parameter::TargetX, 0.0)
            .param(Parameter::TargetY, y)
            .command(Command::Line)
            .param(Parameter::TargetX, 50.0)
            .command(Command::Raster);
    }
    program.finish().to_vec()
}

fn fresh_engine(job: &[u8]) -> Engine<SimPlanner, SimLink, SimBoard> {
    let config = Config::default();
    let planner = SimPlanner::new(config.origin_offset);
    let mut link = SimLink::new(64);
    link.receive(job);
    Engine::new(config, planner, link, SimBoard::new())
}

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let job = raster_job(500);
    group.throughput(Throughput::Bytes(job.len() as u64));
    group.bench_function("raster_500_rows", |b| {
        b.iter_batched(
            || fresh_engine(&job),
            |mut engine| {
                while engine.poll() {}
                black_box(engine.planner().submitted().len());
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let mut engine = fresh_engine(&[]);
    let requests = engine.requests();
    group.bench_function("status_telegram", |b| {
        b.iter(|| {
            requests.request_status();
            engine.idle();
            black_box(engine.link_mut().take_output());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_stream, bench_status);
criterion_main!(benches);
