use std::fmt::Write as _;

use crate::models::RunReport;

/// Fixed-name report file written next to the binary's working directory.
pub const REPORT_PATH: &str = "relatorio_importacao.txt";

/// Render the run summary: totals plus one line per failed row.
pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RELATÓRIO DE IMPORTAÇÃO");
    let _ = writeln!(
        out,
        "Total: {}, Sucesso: {}, Falha: {}",
        report.total(),
        report.imported,
        report.failures.len()
    );
    for failure in &report.failures {
        let _ = writeln!(out, "Linha {}: {}", failure.row, failure.reason);
    }
    if let Some(reason) = &report.halted {
        let _ = writeln!(out, "Importação interrompida: {}", reason);
    }
    out
}

/// Emit the summary to stdout and to the fixed-name report file.
pub fn write(report: &RunReport) -> anyhow::Result<()> {
    let rendered = render(report);

    println!("{}", "=".repeat(40));
    print!("{}", rendered);
    println!("{}", "=".repeat(40));

    std::fs::write(REPORT_PATH, &rendered)?;
    tracing::info!("Report written to {}", REPORT_PATH);
    Ok(())
}
