use frame_pacer::FramePacer;

pub fn dummy_workload() {
    std::thread::sleep(std::time::Duration::from_millis(10));
}

pub fn main() -> Result<(), frame_pacer::Error> {
    env_logger::init();

    let mut pacer = FramePacer::new()?;

    loop {
        let tick = pacer.tick();

        dummy_workload();

        println!("dt {:.3}ms - {}", tick.elapsed_ms, pacer);
    }
}
