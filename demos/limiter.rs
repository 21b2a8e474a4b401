use frame_pacer::FramePacer;

pub fn dummy_workload() {
    std::thread::sleep(std::time::Duration::from_millis(1));
}

pub fn main() -> Result<(), frame_pacer::Error> {
    env_logger::init();

    let mut pacer = FramePacer::new()?;
    let granularity = pacer.calibrate_default()?;
    println!("sleep granularity: {granularity:.3}ms");

    pacer.set_target_framerate(60.0)?;

    loop {
        let tick = pacer.tick();

        dummy_workload();

        println!("dt {:.3}ms - {}", tick.elapsed_ms, pacer);
    }
}
