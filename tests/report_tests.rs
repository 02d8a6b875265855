/// Unit tests for run report rendering
use contract_import::models::{RawRecord, RowFailure, RunReport};
use contract_import::report::render;

fn failure(row: usize, reason: &str) -> RowFailure {
    RowFailure {
        row,
        reason: reason.to_string(),
        raw: RawRecord {
            row,
            ..RawRecord::default()
        },
    }
}

#[test]
fn test_summary_counts_every_attempted_record_once() {
    let report = RunReport {
        imported: 3,
        failures: vec![failure(4, "CPF/CNPJ ausente ou inválido")],
        halted: None,
    };

    assert_eq!(report.total(), 4);
    let rendered = render(&report);
    assert!(rendered.contains("Total: 4, Sucesso: 3, Falha: 1"));
    assert!(rendered.contains("Linha 4: CPF/CNPJ ausente ou inválido"));
}

#[test]
fn test_failures_listed_in_source_order() {
    let report = RunReport {
        imported: 0,
        failures: vec![failure(2, "a"), failure(5, "b"), failure(9, "c")],
        halted: None,
    };

    let rendered = render(&report);
    let pos = |needle: &str| rendered.find(needle).unwrap();
    assert!(pos("Linha 2") < pos("Linha 5"));
    assert!(pos("Linha 5") < pos("Linha 9"));
}

#[test]
fn test_halted_run_is_flagged() {
    let report = RunReport {
        imported: 1,
        failures: vec![failure(3, "Database unreachable: connection reset")],
        halted: Some("Database unreachable: connection reset".to_string()),
    };

    let rendered = render(&report);
    assert!(rendered.contains("Importação interrompida"));
}

#[test]
fn test_empty_run() {
    let rendered = render(&RunReport::default());
    assert!(rendered.contains("Total: 0, Sucesso: 0, Falha: 0"));
}
