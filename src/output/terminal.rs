//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{Measurement, Outcome};

/// Format a Measurement for human-readable terminal output.
pub fn format_measurement(measurement: &Measurement) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(48);

    output.push_str("kbest-bench\n");
    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!("  Parameter:   {}\n", measurement.param));
    output.push_str(&format!("  Counter:     {}\n", measurement.counter));
    output.push_str(&format!("  Iterations:  {}\n", measurement.iterations));
    output.push_str(&format!(
        "  Retained:    {} of {}\n",
        measurement.retained, measurement.k_best
    ));
    output.push('\n');

    output.push_str(&format!("  {}\n\n", format_outcome(measurement)));

    output.push_str(&format!(
        "    {}-best cycles: {}\n",
        measurement.k_best,
        measurement.cycles.to_string().bold()
    ));
    output.push_str(&format!("    Best cycles:    {}\n", measurement.best_cycles));
    output.push_str(&format!(
        "    Spread:         {:.2}% (tolerance {:.2}%)\n",
        measurement.spread() * 100.0,
        measurement.epsilon * 100.0
    ));

    output.push_str(&sep);
    output.push('\n');
    output
}

fn format_outcome(measurement: &Measurement) -> String {
    match measurement.outcome {
        Outcome::Converged => "\u{2713} Converged".green().bold().to_string(),
        Outcome::Exhausted if measurement.retained < measurement.k_best => {
            "\u{26A0} Exhausted before the window filled".red().bold().to_string()
        }
        Outcome::Exhausted => "\u{26A0} Exhausted without converging"
            .yellow()
            .bold()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_measurement(outcome: Outcome, retained: usize) -> Measurement {
        Measurement {
            cycles: 1234,
            best_cycles: 1200,
            worst_retained_cycles: 1206,
            iterations: 812,
            retained,
            k_best: 200,
            epsilon: 0.005,
            outcome,
            param: 1000,
            counter: "rdtsc".to_string(),
        }
    }

    #[test]
    fn test_format_converged() {
        colored::control::set_override(false);
        let output = format_measurement(&make_measurement(Outcome::Converged, 200));
        assert!(output.contains("kbest-bench"));
        assert!(output.contains("Converged"));
        assert!(output.contains("200-best cycles: 1234"));
        assert!(output.contains("Best cycles:    1200"));
        assert!(output.contains("Spread:         0.50%"));
    }

    #[test]
    fn test_format_exhausted_partial() {
        colored::control::set_override(false);
        let output = format_measurement(&make_measurement(Outcome::Exhausted, 12));
        assert!(output.contains("before the window filled"));
        assert!(output.contains("Retained:    12 of 200"));
    }
}
