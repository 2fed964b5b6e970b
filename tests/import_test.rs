use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use sce_import::{Column, ImportError, ImportOutput, PanelFrame, SignResolution, process_survey};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn float(values: Vec<Option<f64>>) -> ArrayRef {
    Arc::new(Float64Array::from(values))
}

fn blank() -> ArrayRef {
    float(vec![None; 5])
}

/// Five interviews for two respondents, in vendor file order rather than
/// panel order. Respondent 21 is interviewed in June, July and August 2013,
/// respondent 7 in June and August. Sorted panel order is therefore the old
/// rows [1, 3, 0, 2, 4].
fn survey_columns() -> Vec<(String, ArrayRef)> {
    let mut columns: Vec<(String, ArrayRef)> = vec![
        (
            "userid".to_string(),
            Arc::new(Int64Array::from(vec![21_i64, 7, 21, 7, 21])) as ArrayRef,
        ),
        (
            "date".to_string(),
            Arc::new(Int32Array::from(vec![201306, 201306, 201307, 201308, 201308])) as ArrayRef,
        ),
        (
            "survey_date".to_string(),
            Arc::new(StringArray::from(vec![
                "2013-06-12",
                "2013-06-20",
                "2013-07-15",
                "2013-08-05",
                "2013-08-19",
            ])) as ArrayRef,
        ),
        (
            "tenure".to_string(),
            float(vec![Some(1.0), Some(1.0), Some(2.0), Some(2.0), Some(3.0)]),
        ),
        (
            "weight".to_string(),
            float(vec![Some(0.8), Some(1.2), Some(0.8), Some(1.2), Some(0.8)]),
        ),
        // Financial well-being today and in a year
        ("Q1".to_string(), float(vec![Some(3.0), None, Some(4.0), Some(2.0), Some(4.0)])),
        ("Q2".to_string(), blank()),
        ("Q3".to_string(), float(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)])),
        // One-year inflation: deflation reported with absolute magnitudes
        ("Q8v2".to_string(), float(vec![Some(1.0), Some(2.0), Some(1.0), None, Some(2.0)])),
        ("Q8v2part2".to_string(), float(vec![Some(3.0), Some(5.0), Some(2.5), None, Some(4.0)])),
        ("Q9_mean".to_string(), float(vec![Some(2.0), Some(4.0), Some(2.2), Some(3.1), Some(4.4)])),
        // Three-year inflation: one deflation magnitude already negative
        ("Q9bv2".to_string(), float(vec![Some(2.0), Some(2.0), None, None, None])),
        ("Q9bv2part2".to_string(), float(vec![Some(3.0), Some(-2.0), None, None, None])),
        // Employment block
        ("Q10_1".to_string(), float(vec![Some(1.0), Some(0.0), Some(1.0), Some(0.0), Some(1.0)])),
        ("Q10_2".to_string(), float(vec![Some(0.0), Some(0.0), Some(0.0), Some(1.0), Some(0.0)])),
        ("Q10_3".to_string(), float(vec![Some(0.0); 5])),
        ("Q12new".to_string(), float(vec![Some(1.0), Some(2.0), Some(1.0), Some(2.0), Some(1.0)])),
        ("Q15".to_string(), float(vec![Some(2.0), Some(1.0), Some(2.0), Some(2.0), Some(2.0)])),
        ("Q16".to_string(), float(vec![None, Some(6.0), None, None, None])),
        ("Q19".to_string(), float(vec![Some(12.0), None, Some(13.0), None, None])),
        // Numerical literacy
        ("QNUM1".to_string(), float(vec![Some(150.0), Some(100.0), None, Some(150.0), Some(150.0)])),
        // Demographics, answered at the first interview only
        ("Q32".to_string(), float(vec![Some(34.0), Some(61.0), None, None, None])),
        ("Q33".to_string(), float(vec![Some(2.0), Some(1.0), None, Some(1.0), None])),
        ("Q34".to_string(), blank()),
        ("Q35_1".to_string(), float(vec![Some(1.0), Some(0.0), None, None, None])),
        ("Q35_2".to_string(), float(vec![Some(0.0), Some(1.0), None, None, None])),
        ("Q36".to_string(), float(vec![Some(4.0), Some(6.0), None, None, None])),
        ("Q38".to_string(), float(vec![Some(1.0), Some(2.0), None, None, None])),
        ("Q43".to_string(), float(vec![Some(1.0), Some(2.0), Some(1.0), Some(2.0), Some(1.0)])),
        ("Q45new_1".to_string(), float(vec![Some(1.0), Some(2.0), None, None, None])),
        ("Q45new_2".to_string(), float(vec![Some(1.0), Some(0.0), None, None, None])),
        ("Q45new_3".to_string(), float(vec![Some(0.0), Some(2.0), None, None, None])),
        ("Q45new_4".to_string(), float(vec![Some(0.0), Some(0.0), None, None, None])),
        ("Q45new_5".to_string(), float(vec![Some(0.0), Some(0.0), None, None, None])),
        ("Q45new_6".to_string(), float(vec![Some(1.0), Some(0.0), None, None, None])),
        ("Q45b".to_string(), float(vec![Some(3.0), Some(2.0), Some(3.0), Some(2.0), Some(4.0)])),
        ("Q47".to_string(), float(vec![Some(5.0), Some(7.0), None, None, None])),
        // Repeat-interview update block: respondent 21 reports a household
        // change at the August interview and files a new roster
        ("D1".to_string(), float(vec![None, None, Some(1.0), Some(1.0), Some(2.0)])),
        ("D2new_1".to_string(), float(vec![None, None, None, None, Some(1.0)])),
        ("D2new_2".to_string(), float(vec![None, None, None, None, Some(2.0)])),
        ("D2new_3".to_string(), float(vec![None, None, None, None, Some(0.0)])),
        ("D2new_4".to_string(), float(vec![None, None, None, None, Some(0.0)])),
        ("D2new_5".to_string(), float(vec![None, None, None, None, Some(0.0)])),
        ("D2new_6".to_string(), float(vec![None, None, None, None, Some(1.0)])),
        ("DSAME".to_string(), float(vec![None, None, Some(1.0), Some(3.0), Some(2.0)])),
        ("DQ38".to_string(), float(vec![None, None, Some(1.0), None, Some(1.0)])),
        ("D6".to_string(), float(vec![None, None, None, Some(6.0), None])),
    ];

    for bin in 1..=10 {
        columns.push((format!("Q9_bin{bin}"), blank()));
        columns.push((format!("Q9c_bin{bin}"), blank()));
    }
    for name in [
        "Q4new", "Q5new", "Q6new", "Q9_var", "Q9_cent50", "Q9_iqr", "Q9_probdeflation",
        "Q9c_mean", "Q9c_var", "Q9c_cent50", "Q9c_iqr", "Q9c_probdeflation", "Q11", "Q13new",
        "Q14new", "Q17new", "Q18new", "Q20new", "Q21new", "Q22new", "Q23v2", "Q23v2part2",
        "Q24_1", "Q24_2", "Q25v2", "Q25v2part2", "Q26v2", "Q26v2part2", "Q27v2", "Q27v2part2",
        "Q28", "Q29", "Q30new", "Q31v2", "Q31v2part2", "C1_1", "C1_2", "C2", "C2part2", "C3",
        "C3part2", "QNUM2", "QNUM3", "QNUM5", "QNUM6", "QNUM8", "QNUM9", "Q37", "Q41", "Q42",
        "Q44", "Q46", "D3",
    ] {
        columns.push((name.to_string(), blank()));
    }
    columns
}

fn batch_from(columns: Vec<(String, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
        .collect();
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn survey_batch() -> RecordBatch {
    batch_from(survey_columns())
}

fn replace_column(columns: &mut [(String, ArrayRef)], name: &str, array: ArrayRef) {
    let entry = columns
        .iter_mut()
        .find(|(candidate, _)| candidate == name)
        .unwrap_or_else(|| panic!("fixture has no column {name}"));
    entry.1 = array;
}

fn processed() -> ImportOutput {
    init_logging();
    process_survey(&survey_batch()).unwrap()
}

fn floats(frame: &PanelFrame, name: &str) -> Vec<Option<f64>> {
    frame.float_column(name).unwrap().to_vec()
}

fn bytes(frame: &PanelFrame, name: &str) -> Vec<Option<u8>> {
    match frame.column(name) {
        Some(Column::UInt8(values)) => values.clone(),
        other => panic!("expected a uint8 column for {name}, got {other:?}"),
    }
}

fn ints(frame: &PanelFrame, name: &str) -> Vec<Option<i32>> {
    match frame.column(name) {
        Some(Column::Int32(values)) => values.clone(),
        other => panic!("expected an int32 column for {name}, got {other:?}"),
    }
}

#[test]
fn test_panel_is_sorted_and_keyed() {
    let output = processed();

    let keys: Vec<(i64, i32)> = output
        .full
        .index()
        .keys()
        .iter()
        .map(|key| (key.respondent, key.wave))
        .collect();
    assert_eq!(
        keys,
        vec![(7, 201306), (7, 201308), (21, 201306), (21, 201307), (21, 201308)]
    );

    // Both tables share the index and lead their batches with the key
    let batch = output.extract.to_record_batch().unwrap();
    assert_eq!(batch.schema().field(0).name(), "userid");
    assert_eq!(batch.schema().field(1).name(), "wid");
    assert_eq!(batch.num_rows(), 5);

    let dates = output.extract.date_column("date").unwrap();
    assert_eq!(dates[0], NaiveDate::from_ymd_opt(2013, 6, 20));
    assert_eq!(dates[4], NaiveDate::from_ymd_opt(2013, 8, 19));
    assert_eq!(floats(&output.extract, "tenure"), vec![
        Some(1.0),
        Some(2.0),
        Some(1.0),
        Some(2.0),
        Some(3.0)
    ]);
}

#[test]
fn test_report_summarizes_the_run() {
    let output = processed();
    let report = &output.report;

    assert_eq!(report.rows, 5);
    assert_eq!(report.respondents, 2);
    assert_eq!(report.spell_distribution.get(&2), Some(&1));
    assert_eq!(report.spell_distribution.get(&3), Some(&1));

    // One sign event per direction and magnitude pair in this vintage
    assert_eq!(report.sign_events.len(), 9);
    assert!(report.has_warnings());
    let json = report.to_json().unwrap();
    assert!(json.contains("\"respondents\": 2"));
}

#[test]
fn test_sign_convention_inferred_over_the_whole_batch() {
    let output = processed();

    // Both deflation magnitudes are positive, so the file stores absolute
    // values and the flagged rows are negated
    assert_eq!(floats(&output.extract, "infl_1y"), vec![
        Some(-5.0),
        None,
        Some(3.0),
        Some(2.5),
        Some(-4.0)
    ]);
    let event = output
        .report
        .sign_events
        .iter()
        .find(|event| event.variable == "Q8v2part2")
        .unwrap();
    assert_eq!(event.resolution, SignResolution::Flipped);
    assert_eq!(event.flagged_rows, 2);
}

#[test]
fn test_ambiguous_sign_is_surfaced_not_fixed() {
    let output = processed();

    // The three-year pair mixes signs among deflation rows; data stays
    // untouched and the condition lands on the report
    assert_eq!(floats(&output.extract, "infl_3y"), vec![
        Some(-2.0),
        None,
        Some(3.0),
        None,
        None
    ]);
    let ambiguous: Vec<_> = output.report.ambiguous_signs().collect();
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(ambiguous[0].variable, "Q9bv2part2");
}

#[test]
fn test_employment_indicators() {
    let output = processed();

    assert_eq!(bytes(&output.extract, "working"), vec![
        Some(0),
        Some(1),
        Some(1),
        Some(1),
        Some(1)
    ]);
    assert_eq!(bytes(&output.extract, "self_employed"), vec![
        Some(1),
        Some(1),
        Some(0),
        Some(0),
        Some(0)
    ]);
    assert_eq!(bytes(&output.extract, "looking_for_job"), vec![
        Some(1),
        Some(0),
        Some(0),
        Some(0),
        Some(0)
    ]);
    // The two gated duration questions collapse into one variable
    assert_eq!(floats(&output.extract, "jobless_length"), vec![
        Some(6.0),
        None,
        Some(12.0),
        Some(13.0),
        None
    ]);
}

#[test]
fn test_literacy_grading_preserves_missing() {
    let output = processed();

    assert_eq!(floats(&output.extract, "num_lit_q1"), vec![
        Some(100.0),
        Some(150.0),
        Some(150.0),
        None,
        Some(150.0)
    ]);
    assert_eq!(bytes(&output.extract, "num_lit_q1_correct"), vec![
        Some(0),
        Some(1),
        Some(1),
        None,
        Some(1)
    ]);
}

#[test]
fn test_once_asked_demographics_reach_every_wave() {
    let output = processed();

    assert_eq!(ints(&output.extract, "age_init"), vec![
        Some(61),
        Some(61),
        Some(34),
        Some(34),
        Some(34)
    ]);
    assert_eq!(bytes(&output.extract, "female"), vec![
        Some(1),
        Some(1),
        Some(0),
        Some(0),
        Some(0)
    ]);
    assert_eq!(bytes(&output.extract, "black"), vec![
        Some(1),
        Some(1),
        Some(0),
        Some(0),
        Some(0)
    ]);
    assert_eq!(bytes(&output.extract, "college"), vec![
        Some(1),
        Some(1),
        Some(0),
        Some(0),
        Some(0)
    ]);
    assert_eq!(bytes(&output.extract, "educ"), vec![
        Some(4),
        Some(4),
        Some(3),
        Some(3),
        Some(3)
    ]);
    // Hispanic origin was never answered and stays missing everywhere
    assert_eq!(bytes(&output.extract, "hispanic"), vec![None; 5]);
}

#[test]
fn test_roster_updates_carry_forward() {
    let output = processed();

    // Waves without a roster inherit the last complete one; the August
    // change report replaces respondent 21's roster from that wave on
    assert_eq!(floats(&output.full, "Q45new_2"), vec![
        Some(0.0),
        Some(0.0),
        Some(1.0),
        Some(1.0),
        Some(2.0)
    ]);
    assert_eq!(ints(&output.extract, "num_kids"), vec![
        Some(2),
        Some(2),
        Some(1),
        Some(1),
        Some(2)
    ]);
    assert_eq!(bytes(&output.extract, "hh_changed"), vec![
        Some(0),
        Some(0),
        Some(0),
        Some(0),
        Some(1)
    ]);
}

#[test]
fn test_repeat_questions_patch_baseline() {
    let output = processed();

    // Partnership status is patched from the repeat question; respondent 7
    // answered neither question at their second interview, so the first
    // answer carries forward
    assert_eq!(floats(&output.full, "Q38"), vec![
        Some(2.0),
        Some(2.0),
        Some(1.0),
        Some(1.0),
        Some(1.0)
    ]);
    assert_eq!(bytes(&output.extract, "couple"), vec![
        Some(0),
        Some(0),
        Some(1),
        Some(1),
        Some(1)
    ]);
    // Income brackets are patched row by row, never filled
    assert_eq!(floats(&output.extract, "hh_inc"), vec![
        Some(7.0),
        Some(6.0),
        Some(5.0),
        None,
        None
    ]);
    assert_eq!(floats(&output.full, "Q47"), vec![Some(7.0), Some(6.0), Some(5.0), None, None]);
    assert_eq!(bytes(&output.extract, "same_employer"), vec![
        None,
        Some(0),
        None,
        Some(1),
        Some(1)
    ]);
}

#[test]
fn test_spouse_update_without_baseline_adopts_the_column() {
    init_logging();
    let mut columns = survey_columns();
    // A vintage that retired the part-time baseline column but still asks
    // the repeat-interview spouse employment updates
    columns.push((
        "HH2_1".to_string(),
        float(vec![Some(0.0), Some(1.0), None, None, None]),
    ));
    columns.push((
        "DHH2_1".to_string(),
        float(vec![None, None, Some(1.0), Some(0.0), None]),
    ));
    columns.push((
        "DHH2_2".to_string(),
        float(vec![None, None, Some(0.0), Some(1.0), Some(1.0)]),
    ));

    let output = process_survey(&batch_from(columns)).unwrap();
    // The baseline column is patched; the one without a baseline is
    // adopted from the update block as-is
    assert_eq!(floats(&output.full, "HH2_1"), vec![
        Some(1.0),
        Some(0.0),
        Some(0.0),
        Some(1.0),
        None
    ]);
    assert_eq!(floats(&output.full, "HH2_2"), vec![
        None,
        Some(1.0),
        None,
        Some(0.0),
        Some(1.0)
    ]);
    assert_eq!(bytes(&output.extract, "spouse_working"), vec![
        Some(1),
        Some(1),
        Some(0),
        Some(1),
        Some(1)
    ]);
}

#[test]
fn test_partial_roster_yields_missing_kids_until_a_complete_report() {
    init_logging();
    let mut columns = survey_columns();
    // Respondent 7's first roster is missing a child category, so no wave
    // has a usable roster until their August change report files one
    replace_column(&mut columns, "Q45new_3", float(vec![Some(0.0), None, None, None, None]));
    replace_column(&mut columns, "D1", float(vec![None, None, Some(1.0), Some(2.0), Some(2.0)]));
    replace_column(&mut columns, "D2new_1", float(vec![None, None, None, Some(2.0), Some(1.0)]));
    replace_column(&mut columns, "D2new_2", float(vec![None, None, None, Some(1.0), Some(2.0)]));
    replace_column(&mut columns, "D2new_3", float(vec![None, None, None, Some(0.0), Some(0.0)]));
    replace_column(&mut columns, "D2new_4", float(vec![None, None, None, Some(1.0), Some(0.0)]));
    replace_column(&mut columns, "D2new_5", float(vec![None, None, None, Some(0.0), Some(0.0)]));
    replace_column(&mut columns, "D2new_6", float(vec![None, None, None, Some(0.0), Some(1.0)]));

    let output = process_survey(&batch_from(columns)).unwrap();
    // A partial roster never defaults a sub-count to zero; the sum stays
    // missing until the first complete report
    assert_eq!(ints(&output.extract, "num_kids"), vec![
        None,
        Some(2),
        Some(1),
        Some(1),
        Some(2)
    ]);
    assert_eq!(floats(&output.full, "Q45new_2"), vec![
        None,
        Some(1.0),
        Some(1.0),
        Some(1.0),
        Some(2.0)
    ]);
}

#[test]
fn test_optional_blocks_absent_from_this_vintage() {
    let output = processed();

    assert!(!output.extract.contains("infl_5y"));
    assert!(!output.extract.contains("take_fin_risk"));
    assert!(!output.extract.contains("spouse_working"));
    assert_eq!(output.report.skipped_blocks.len(), 6);
    assert!(
        output
            .report
            .skipped_blocks
            .iter()
            .any(|block| block.contains("five-year inflation"))
    );
}

#[test]
fn test_row_order_does_not_affect_output() {
    init_logging();
    let batch = survey_batch();

    let mut order: Vec<u32> = (0..5).collect();
    order.shuffle(&mut rand::rng());
    let order = UInt32Array::from(order);
    let shuffled_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|column| take(column.as_ref(), &order, None).unwrap())
        .collect();
    let shuffled = RecordBatch::try_new(batch.schema(), shuffled_columns).unwrap();

    let from_sorted = process_survey(&batch).unwrap();
    let from_shuffled = process_survey(&shuffled).unwrap();
    assert_eq!(
        from_sorted.full.to_record_batch().unwrap(),
        from_shuffled.full.to_record_batch().unwrap()
    );
    assert_eq!(
        from_sorted.extract.to_record_batch().unwrap(),
        from_shuffled.extract.to_record_batch().unwrap()
    );
}

#[test]
fn test_duplicate_interview_is_fatal() {
    let columns: Vec<(String, ArrayRef)> = vec![
        ("userid".to_string(), Arc::new(Int64Array::from(vec![1_i64, 1])) as ArrayRef),
        ("date".to_string(), Arc::new(Int32Array::from(vec![201306, 201306])) as ArrayRef),
    ];
    let result = process_survey(&batch_from(columns));
    assert!(matches!(
        result,
        Err(ImportError::DuplicateKey { respondent: 1, wave: 201306 })
    ));
}

#[test]
fn test_missing_identifier_is_fatal() {
    let columns: Vec<(String, ArrayRef)> = vec![
        ("userid".to_string(), Arc::new(Int64Array::from(vec![Some(1_i64), None])) as ArrayRef),
        ("date".to_string(), Arc::new(Int32Array::from(vec![201306, 201307])) as ArrayRef),
    ];
    let result = process_survey(&batch_from(columns));
    assert!(matches!(result, Err(ImportError::Schema(_))));
}

#[test]
fn test_gated_answer_outside_gate_is_fatal() {
    let mut columns = survey_columns();
    // An unemployment duration from a respondent who is not searching
    replace_column(
        &mut columns,
        "Q16",
        float(vec![None, Some(6.0), Some(4.0), None, None]),
    );
    let result = process_survey(&batch_from(columns));
    assert!(matches!(
        result,
        Err(ImportError::DomainInvariant { violations: 1, .. })
    ));
}

#[test]
fn test_conflicting_once_asked_answer_is_fatal() {
    let mut columns = survey_columns();
    // Respondent 7 reports two different genders across waves
    replace_column(
        &mut columns,
        "Q33",
        float(vec![Some(2.0), Some(1.0), None, Some(2.0), None]),
    );
    let result = process_survey(&batch_from(columns));
    match result {
        Err(ImportError::AmbiguousConstant { column, respondent }) => {
            assert_eq!(column, "Q33");
            assert_eq!(respondent, 7);
        }
        other => panic!("expected an ambiguous constant error, got {other:?}"),
    }
}
