//! Basic example of building and walking a Hamiltonian cycle

use hamcycle_core::{Cell, CycleConfig, CycleEngine};

fn main() {
    let config = CycleConfig::new(6, 8).max_block_size(12).seed(2024);
    println!(
        "Building a cycle on a {}x{} grid (blocks of at most {} cells)...\n",
        config.rows, config.cols, config.max_block_size
    );

    let mut engine = CycleEngine::new();
    let cycle = match engine.build(&config) {
        Ok(cycle) => cycle,
        Err(err) => {
            eprintln!("Construction failed: {}", err);
            return;
        }
    };

    let stats = cycle.stats();
    println!("Blocks: {}", stats.blocks);
    println!("Candidate kernels: {}", stats.kernels);
    println!("Swaps performed: {}\n", stats.swaps);

    // Number every cell by its position along the cycle
    for row in 0..config.rows {
        let line: Vec<String> = (0..config.cols)
            .map(|col| match cycle.graph().index_of(Cell::new(row, col)) {
                Some(step) => format!("{:>3}", step),
                None => "  .".to_string(),
            })
            .collect();
        println!("{}", line.join(" "));
    }

    // Follow the cycle for a few steps from an arbitrary cell
    println!("\nTen steps from (3, 4):");
    let path: Vec<String> = cycle
        .graph()
        .iter_from(Cell::new(3, 4))
        .take(10)
        .map(|cell| cell.to_string())
        .collect();
    println!("{}", path.join(" -> "));

    // A second build of the same size reuses every solved block shape
    let solved = engine.cache().solved_shapes();
    if engine.build(&config.clone().seed(7)).is_ok() {
        println!(
            "\nRebuilt with a new seed; {} block shapes came from the cache",
            solved
        );
    }
}
