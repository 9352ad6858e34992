use docintel::gate::evaluate;

const LONG: &str = "a persona long enough";

#[test]
fn file_count_wins_over_everything() {
    let g = evaluate(0, "", "");
    assert!(!g.enabled);
    assert_eq!(g.label, "Need 3 more file(s)");
    assert_eq!(evaluate(2, LONG, LONG).label, "Need 1 more file(s)");
}

#[test]
fn persona_before_job() {
    let g = evaluate(3, "short", "");
    assert!(!g.enabled);
    assert_eq!(g.label, "Define persona");
}

#[test]
fn job_last() {
    let g = evaluate(5, LONG, "too short");
    assert!(!g.enabled);
    assert_eq!(g.label, "Define job to be done");
}

#[test]
fn enabled_when_all_met() {
    let g = evaluate(3, LONG, LONG);
    assert!(g.enabled);
    assert_eq!(g.label, "Analyze Documents");
    assert!(evaluate(10, LONG, LONG).enabled);
}

#[test]
fn text_length_is_measured_after_trimming() {
    // Exactly 10 characters is not enough; 11 is.
    assert!(!evaluate(3, "   0123456789   ", LONG).enabled);
    assert!(evaluate(3, "  0123456789a  ", LONG).enabled);
    assert!(!evaluate(3, LONG, "\n\t0123456789\n").enabled);
}

#[test]
fn truth_table() {
    for staged in 0..=10usize {
        for persona in ["", "0123456789", "0123456789x"] {
            for job in ["", "0123456789", "0123456789x"] {
                let expect = staged >= 3 && persona.len() > 10 && job.len() > 10;
                assert_eq!(evaluate(staged, persona, job).enabled, expect);
            }
        }
    }
}
