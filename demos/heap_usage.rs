//! Walks through the life of an image: allocate, free, compact, merge,
//! resize and a round trip through a file.

use core::ops::ControlFlow;
use eatalloc::prelude::*;

fn show<B: AsRef<[u8]>>(label: &str, heap: &Master<u32, B>) {
    println!(
        "{label:<16} b1={:<5} b2={:<5} entries={:<3} live={:<3} free={}",
        heap.boundary_1(),
        heap.boundary_2(),
        heap.num_entries(),
        heap.len(),
        heap.free_area_size()
    );
}

fn main() -> Result<()> {
    let mut heap = MasterConfig::new(512).capacity(2048).build::<u32>()?;
    show("fresh", &heap);

    let names: Vec<Handle> = ["ada", "brian", "claude", "dennis"]
        .iter()
        .map(|name| heap.duplicate_str(name))
        .collect::<Result<_>>()?;
    show("four strings", &heap);

    // Freeing an older block only marks it
    heap.free(names[1])?;
    show("freed brian", &heap);

    // Freeing the newest block unwinds the stack
    heap.free(names[3])?;
    show("freed dennis", &heap);

    let report = heap.compact();
    show("compacted", &heap);
    for r in &report.relocations {
        println!("  moved {} -> {}", r.from, r.to);
    }
    let claude = report.relocated(names[2]).unwrap_or(names[2]);
    println!("  claude is now {:?}", heap.get_cstr(claude));

    let mut other = Master::<u32>::with_capacity(256)?;
    other.duplicate(b"from another image")?;
    heap.merge(&other)?;
    show("merged", &heap);

    heap.resize(2048)?;
    show("resized", &heap);

    let _: Option<()> = heap.rfor_each_block(|handle, bytes| {
        println!("  {handle}: {:?}", String::from_utf8_lossy(bytes));
        ControlFlow::Continue(())
    });

    let path = std::env::temp_dir().join("eatalloc_heap_usage.eat");
    heap.save_to_file(&path)?;
    let (restored, outcome) = Master::<u32>::from_file(&path, 4096)?;
    show("restored", &restored);
    println!("  load outcome: {outcome:?}");
    std::fs::remove_file(&path)?;

    Ok(())
}
