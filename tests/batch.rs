use kira_hemostasis::io::batch::{BATCH_HEADER, evaluate_batch, evaluate_panel, write_batch_tsv};
use kira_hemostasis::io::panel::LabPanel;
use kira_hemostasis::labs::{LabInput, MedicationContext};
use kira_hemostasis::tables::load_builtin;
use tempfile::TempDir;

fn panel(label: &str, labs: LabInput, scenario: Option<&str>) -> LabPanel {
    LabPanel {
        label: label.to_string(),
        labs,
        medications: MedicationContext::default(),
        scenario: scenario.map(str::to_string),
        hit4t: None,
    }
}

#[test]
fn batch_row_reports_known_scenario_only() {
    let config = load_builtin().unwrap();
    let known = evaluate_panel(&config, &panel("a", LabInput::default(), Some("hemophilia_a")));
    assert_eq!(known.scenario.as_deref(), Some("hemophilia_a"));

    let unknown = evaluate_panel(&config, &panel("b", LabInput::default(), Some("no_such_scenario")));
    assert!(unknown.scenario.is_none());
    assert_eq!(unknown.pattern, "normal profile");
    assert_eq!(unknown.n_diagnoses, 0);
}

#[test]
fn batch_rows_keep_input_order() {
    let config = load_builtin().unwrap();
    let panels = vec![
        panel("normal", LabInput::default(), None),
        panel(
            "aptt",
            LabInput {
                aptt: 55.0,
                ..LabInput::default()
            },
            None,
        ),
        panel(
            "tt",
            LabInput {
                tt: 25.0,
                ..LabInput::default()
            },
            None,
        ),
    ];
    let rows = evaluate_batch(&config, &panels, 2).unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["normal", "aptt", "tt"]);
    assert_eq!(rows[1].pattern, "isolated aPTT prolongation");
    assert_eq!(rows[2].top_diagnosis.as_deref(), Some("Dysfibrinogenemia"));

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("batch.tsv");
    write_batch_tsv(&path, &rows).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], BATCH_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1].ends_with("\t-"));
}
