use ahp::{AhpModel, Evaluation, Ranking};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("AHP: Analytic Hierarchy Process");
    println!("===============================\n");

    if let Err(e) = car_purchase() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn car_purchase() -> Result<(), ahp::AhpError> {
    let criteria = ["Price", "Aesthetics", "Safety", "Consumption"];
    let alternatives = ["Car A", "Car B", "Car C"];
    let mut model = AhpModel::new(&criteria, &alternatives)?;

    let criteria_comparisons = [
        (0, 1, "3"),
        (0, 2, "1/2"),
        (0, 3, "2"),
        (1, 2, "1/5"),
        (1, 3, "1/2"),
        (2, 3, "4"),
    ];
    for (i, j, token) in criteria_comparisons {
        model.set_criteria_comparison(i, j, token)?;
    }

    // One row per criterion: A vs B, A vs C, B vs C.
    let alternative_comparisons = [
        ["3", "5", "2"],
        ["1/3", "1/2", "2"],
        ["1/2", "1/4", "1/3"],
        ["2", "three", "-1"],
    ];
    let pairs: Vec<_> = model.alternatives().pairs().collect();
    for (criterion, row) in alternative_comparisons.iter().enumerate() {
        for (&(i, j), token) in pairs.iter().zip(row) {
            model.set_alternative_comparison(criterion, i, j, token)?;
        }
    }

    let evaluation = model.evaluate()?;
    print_evaluation(&evaluation);

    let mut sliders = evaluation.default_sliders();
    sliders[0] = 1.0;
    println!("\nSensitivity (Price slider raised to 1.0):");
    print_ranking(&evaluation.sensitivity(&sliders)?);

    Ok(())
}

fn print_evaluation(evaluation: &Evaluation) {
    if !evaluation.warnings().is_empty() {
        println!("Warnings:");
        for warning in evaluation.warnings() {
            println!("  {}", warning);
        }
        println!();
    }

    println!("Criterion weights:");
    for (label, weight) in evaluation.weighted_criteria() {
        println!("  {}: {:.4}", label, weight);
    }

    println!("\nAlternative weights per criterion:");
    for (criterion, weights) in evaluation
        .criteria()
        .labels()
        .iter()
        .zip(evaluation.alternative_weights().iter())
    {
        let formatted: Vec<String> = evaluation
            .alternatives()
            .labels()
            .iter()
            .zip(weights.iter())
            .map(|(label, w)| format!("{} {:.4}", label, w))
            .collect();
        println!("  {}: {}", criterion, formatted.join(", "));
    }

    println!("\nRanking:");
    print_ranking(evaluation.ranking());
}

fn print_ranking(ranking: &Ranking) {
    for (i, entry) in ranking.entries().iter().enumerate() {
        println!("  {}. {} ({:.4})", i + 1, entry.label, entry.score);
    }
}
