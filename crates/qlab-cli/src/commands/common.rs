//! Shared helpers for CLI commands.

use console::style;

use qlab_ir::Program;
use qlab_sim::{OutcomeHistogram, StatevectorSimulator};

use crate::config::QlabConfig;

/// Build the simulator described by the configuration.
pub fn simulator(config: &QlabConfig) -> StatevectorSimulator {
    StatevectorSimulator::new(config.simulator_config())
}

/// One-line summary of a program before it runs.
pub fn print_program_header(program: &Program) {
    let circuit = program.circuit();
    println!(
        "{} {} ({} qubits, {} gates, depth {})",
        style("→").cyan().bold(),
        style(circuit.name()).green(),
        circuit.num_qubits(),
        circuit.gate_count(),
        circuit.depth()
    );
}

/// Print a histogram as a bar chart, most frequent first.
pub fn print_histogram(histogram: &OutcomeHistogram) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        histogram.total()
    );

    let mut sorted: Vec<_> = histogram.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let total = histogram.total() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
