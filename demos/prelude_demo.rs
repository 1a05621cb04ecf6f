//! Example demonstrating the prelude import

use eatalloc::prelude::*;

fn main() -> Result<()> {
    // All common types available through prelude:
    // - Allocator trait and Handle
    // - Master, the image allocator
    // - MasterConfig and ImagePreset
    // - EatError and Result

    let mut heap = ImagePreset::Small1K.build::<u32>()?;
    println!(
        "Created {}-byte image, {} bytes free",
        heap.total_size(),
        heap.free_area_size()
    );

    let (handle, slice) = heap.allocate_uninit(8)?;
    slice.copy_from_slice(b"Testing!");
    println!("Allocated {} ({} bytes)", handle, heap.size_of(handle)?);
    heap.free(handle)?;

    match heap.allocate(4096) {
        Err(EatError::OutOfMemory { requested, available }) => {
            println!("Refused {requested} bytes with {available} free");
        }
        other => println!("Unexpected: {other:?}"),
    }

    println!("\nPrelude makes imports easy: use eatalloc::prelude::*");
    Ok(())
}
