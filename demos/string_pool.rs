//! Using the shared string pool

use objectpool::StringPool;
use std::thread;

fn main() {
    println!("=== objectpool - String Pool ===\n");

    let pool = StringPool::shared();
    pool.diagnostics().set_enabled(true);

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            thread::spawn(move || {
                for line in 0..100 {
                    let mut text = StringPool::shared().get_object_with("worker ").unwrap();
                    text.push_str(&format!("{worker} line {line}"));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    println!("Idle buffers: {}", pool.objects_in_pool_count());
    println!("Diagnostics: {:?}", pool.diagnostics().snapshot());
}
