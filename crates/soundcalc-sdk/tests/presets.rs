use soundcalc::{RegimeId, SoundnessError};
use soundcalc_sdk::{
    config::zkvm_from_toml_str,
    presets::{load_all_presets, Preset},
    report::{console_summary, write_reports, zkvm_markdown, SUMMARY_REPORT_NAME},
};
use test_case::test_case;

#[test_case(Preset::Risc0, &[RegimeId::UniqueDecoding, RegimeId::JohnsonBound])]
#[test_case(Preset::Zisk, &[RegimeId::UniqueDecoding, RegimeId::JohnsonBound])]
#[test_case(Preset::Jagged, &[RegimeId::UniqueDecoding])]
fn preset_regimes(preset: Preset, regimes: &[RegimeId]) {
    let zkvm = preset.load().unwrap();
    for (_, levels) in zkvm.security_levels() {
        assert_eq!(levels.keys().copied().collect::<Vec<_>>(), regimes);
        for table in levels.values() {
            let total = table.as_ref().unwrap().total();
            assert!(total.is_some_and(|bits| bits > 0));
        }
    }
    assert!(zkvm.expected_proof_size_bits() <= zkvm.proof_size_bits());
}

#[test]
fn risc0_fri_rounds() {
    let zkvm = Preset::Risc0.load().unwrap();
    let levels = zkvm.circuits()[0].security_levels();
    let udr = levels[&RegimeId::UniqueDecoding].as_ref().unwrap();
    assert!(udr.get("commit round 4").is_some());
    assert!(udr.get("commit round 5").is_none());
    for label in ["batching", "query phase", "ALI", "DEEP"] {
        assert!(udr.get(label).is_some(), "missing {label}");
    }
}

#[test]
fn jagged_preset_has_lookup_and_zerocheck() {
    let zkvm = Preset::Jagged.load().unwrap();
    let levels = zkvm.circuits()[0].security_levels();
    let udr = levels[&RegimeId::UniqueDecoding].as_ref().unwrap();
    for label in ["reduce to dense PCS", "zerocheck", "memory"] {
        assert!(udr.get(label).is_some(), "missing {label}");
    }
}

#[test]
fn whir_security_is_unfinished() {
    let zkvm = Preset::DummyWhir.load().unwrap();
    let levels = zkvm.circuits()[0].security_levels();
    assert!(!levels.is_empty());
    for table in levels.values() {
        assert_eq!(table, &Err(SoundnessError::UnfinishedModel("WHIR")));
    }
    assert!(zkvm.weakest_circuits().is_empty());
    assert!(zkvm.proof_size_bits() > 0);
}

#[test]
fn all_presets_load() {
    assert_eq!(load_all_presets().unwrap().len(), Preset::all().len());
}

#[test]
fn console_summary_lists_levels() {
    let zkvm = Preset::Zisk.load().unwrap();
    let summary = console_summary(&zkvm).unwrap();
    assert!(summary.starts_with("zkVM: ZisK"));
    assert!(summary.contains("KiB"));
    assert!(summary.contains(r#""UDR""#));
    assert!(summary.contains(r#""total""#));

    let whir = console_summary(&Preset::DummyWhir.load().unwrap()).unwrap();
    assert!(whir.contains(r#""error""#));
}

#[test]
fn reports_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let zkvms = load_all_presets().unwrap();
    let written = write_reports(&zkvms, dir.path()).unwrap();
    assert_eq!(written.len(), zkvms.len() + 1);

    for name in ["risc0.md", "zisk.md", "jagged_example.md", "dummywhir.md"] {
        assert!(dir.path().join(name).is_file(), "missing {name}");
    }
    let summary = std::fs::read_to_string(dir.path().join(SUMMARY_REPORT_NAME)).unwrap();
    assert!(summary.contains("[RISC0](risc0.md)"));
    assert!(summary.contains("| BabyBear^4 |"));

    let whir = std::fs::read_to_string(dir.path().join("dummywhir.md")).unwrap();
    assert!(whir.contains("Security levels unavailable"));
}

#[test]
fn multi_circuit_report_has_overview() {
    let circuit = |name: &str, num_queries: usize| {
        format!(
            r#"
[[circuits]]
name = "{name}"
num_constraints = 100
air_max_degree = 3
max_combo = 3

[circuits.pcs]
protocol = "fri"
hash_size_bits = 256
rho = 0.5
trace_length = 1024
field = "Goldilocks^3"
batch_size = 8
power_batching = true
num_queries = {num_queries}
folding_factors = [4, 4, 4]
early_stop_degree = 32
grinding_query_phase = 0
"#
        )
    };
    let toml_str = format!(
        "[zkvm]\nname = \"Two Circuits\"\n{}{}",
        circuit("main", 128),
        circuit("recursion", 16)
    );
    let zkvm = zkvm_from_toml_str(&toml_str).unwrap();
    let md = zkvm_markdown(&zkvm);
    assert!(md.starts_with("# Two Circuits"));
    assert!(md.contains("## zkVM overview"));
    assert!(md.contains("| JBR | **"));
    assert!(md.contains("[recursion](#recursion) |"));
    assert!(md.contains("## main"));
}
