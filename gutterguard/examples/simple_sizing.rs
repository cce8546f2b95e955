//! Simple sizing example: size a gutter from `SIZE:QTY` arguments and print results.

use gutterguard::prelude::*;

fn main() -> Result<(), SizingError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = if args.is_empty() {
        vec!["4/0:3".to_string(), "2:2".to_string()]
    } else {
        args
    };

    let rows: Vec<EntryInput> = args
        .iter()
        .map(|arg| match arg.split_once(':') {
            Some((size, qty)) => EntryInput::new(size, qty),
            None => EntryInput::new(arg.as_str(), "1"),
        })
        .collect();

    let engine = SizingEngine::builtin()?;
    let result = engine.compute_input(&rows)?;

    println!("Reference table: {}", engine.tables().edition());
    println!("Total conductor area: {:.4} sq in", result.total_area);
    println!("Minimum cross-section (20% fill): {:.2} sq in", result.min_cross_section);
    println!("Minimum bending space: {} in", result.min_bending_space);

    match result.recommended_label() {
        Some(label) => println!("Recommended: {} minimum gutter size", label),
        None => {
            println!("Custom size required (needs {} in per side)", result.min_required_side);
            std::process::exit(1);
        }
    }
    Ok(())
}
