use soundcalc::{
    field::{GOLDILOCKS_3, KOALABEAR_4},
    lookups::{LogUp, LogUpConfig, LogUpKind},
    pcs::{
        fri_proof_size_bits, Fri, FriConfig, JaggedConfig, JaggedPcs, Pcs,
        PolynomialCommitmentScheme,
    },
    proxgaps::{ProximityGap, UniqueDecodingRegime},
    Arithmetization, Circuit, CircuitConfig, DeepAliParams, RegimeId, SecurityTable,
    SoundnessError, ZerocheckParams,
};
use test_case::test_case;

fn fri_config() -> FriConfig {
    FriConfig {
        hash_size_bits: 256,
        rho: 0.5,
        trace_length: 1024,
        field: GOLDILOCKS_3,
        batch_size: 8,
        power_batching: true,
        num_queries: 64,
        folding_factors: vec![4, 4, 4],
        early_stop_degree: 32,
        grinding_query_phase: 0,
        grinding_commit_phase: 0,
        gap_to_radius: None,
    }
}

fn circuit(fri: FriConfig, grinding_deep: usize) -> Circuit {
    Circuit::new(CircuitConfig {
        name: "main".to_string(),
        pcs: Fri::new(fri).unwrap().into(),
        field: GOLDILOCKS_3,
        gap_to_radius: None,
        arithmetization: Arithmetization::DeepAli(DeepAliParams {
            num_constraints: 100,
            air_max_degree: 3,
            max_combo: 3,
            grinding_deep,
        }),
        lookups: vec![],
        udr_only: false,
        capacity_bound: None,
    })
    .unwrap()
}

fn table(circuit: &Circuit, regime: RegimeId) -> SecurityTable {
    circuit.security_levels().remove(&regime).unwrap().unwrap()
}

/// Asserts that `changed` differs from `base` by exactly `bits` in the entries selected by
/// `affected`, and not at all elsewhere.
fn assert_shifted(
    base: &SecurityTable,
    changed: &SecurityTable,
    bits: u32,
    affected: fn(&str) -> bool,
) {
    for (label, base_bits) in base.iter().filter(|(label, _)| *label != "total") {
        let expected = if affected(label) { base_bits + bits } else { base_bits };
        assert_eq!(changed.get(label), Some(expected), "entry `{label}`");
    }
}

#[test_case(RegimeId::UniqueDecoding, 8)]
#[test_case(RegimeId::UniqueDecoding, 20)]
#[test_case(RegimeId::JohnsonBound, 8)]
#[test_case(RegimeId::JohnsonBound, 20)]
fn commit_grinding_only_moves_commit_rounds(regime: RegimeId, bits: usize) {
    let base = table(&circuit(fri_config(), 0), regime);
    let ground = table(
        &circuit(
            FriConfig {
                grinding_commit_phase: bits,
                ..fri_config()
            },
            0,
        ),
        regime,
    );
    assert_shifted(&base, &ground, bits as u32, |label| {
        label.starts_with("commit round")
    });
}

#[test_case(RegimeId::UniqueDecoding, 8)]
#[test_case(RegimeId::UniqueDecoding, 20)]
#[test_case(RegimeId::JohnsonBound, 8)]
#[test_case(RegimeId::JohnsonBound, 20)]
fn query_grinding_only_moves_query_phase(regime: RegimeId, bits: usize) {
    let base = table(&circuit(fri_config(), 0), regime);
    let ground = table(
        &circuit(
            FriConfig {
                grinding_query_phase: bits,
                ..fri_config()
            },
            0,
        ),
        regime,
    );
    assert_shifted(&base, &ground, bits as u32, |label| label == "query phase");
}

#[test_case(RegimeId::UniqueDecoding, 8)]
#[test_case(RegimeId::UniqueDecoding, 20)]
#[test_case(RegimeId::JohnsonBound, 8)]
#[test_case(RegimeId::JohnsonBound, 20)]
fn deep_grinding_only_moves_deep(regime: RegimeId, bits: usize) {
    let base = table(&circuit(fri_config(), 0), regime);
    let ground = table(&circuit(fri_config(), bits), regime);
    assert_shifted(&base, &ground, bits as u32, |label| label == "DEEP");
    assert_eq!(base.get("ALI"), ground.get("ALI"));
}

#[test_case(vec![4, 4, 4], 16 ; "one round short of the degree")]
#[test_case(vec![4, 4], 32 ; "too few rounds")]
#[test_case(vec![8, 8, 8], 32 ; "overshoots")]
fn early_stop_mismatch(folding_factors: Vec<usize>, early_stop_degree: usize) {
    let err = Fri::new(FriConfig {
        folding_factors,
        early_stop_degree,
        ..fri_config()
    })
    .unwrap_err();
    assert!(matches!(err, SoundnessError::FriEarlyStopMismatch { .. }), "{err}");
}

#[test]
fn proof_size_literal_example() {
    // Roots: 3. Final polynomial: 1/2 * 32. Per query: (7 + 3) + (6 + 2) + (5 + 2).
    assert_eq!(
        fri_proof_size_bits(1, 1, 3, 10, 128, &[2, 2], 0.5, false),
        3 + 16 + 10 * 25
    );
}

#[test_case(1024, vec![4, 4, 4], 32, 64)]
#[test_case(1 << 16, vec![16, 16, 16], 32, 100)]
#[test_case(1 << 20, vec![2; 10], 2048, 2)]
#[test_case(1 << 12, vec![8, 8, 8, 8], 2, 1000)]
fn expected_proof_size_never_exceeds_worst_case(
    trace_length: usize,
    folding_factors: Vec<usize>,
    early_stop_degree: usize,
    num_queries: usize,
) {
    let fri = Fri::new(FriConfig {
        trace_length,
        folding_factors,
        early_stop_degree,
        num_queries,
        ..fri_config()
    })
    .unwrap();
    assert!(fri.expected_proof_size_bits() <= fri.proof_size_bits());
}

#[test]
fn expected_proof_size_with_one_query_is_worst_case() {
    let fri = Fri::new(FriConfig {
        num_queries: 1,
        ..fri_config()
    })
    .unwrap();
    assert_eq!(fri.expected_proof_size_bits(), fri.proof_size_bits());
}

#[test_case(0.5, 1024.0)]
#[test_case(0.25, 1048576.0)]
#[test_case(0.0625, 8.0)]
fn unique_decoding_list_size(rate: f64, dimension: f64) {
    let regime = UniqueDecodingRegime::new(GOLDILOCKS_3);
    assert_eq!(regime.max_list_size(rate, dimension).unwrap(), 1);
}

#[test]
fn regime_selection() {
    let both = circuit(fri_config(), 0).security_levels();
    assert_eq!(
        both.keys().copied().collect::<Vec<_>>(),
        [RegimeId::UniqueDecoding, RegimeId::JohnsonBound]
    );

    let udr = Circuit::new(CircuitConfig {
        name: "udr".to_string(),
        pcs: Fri::new(fri_config()).unwrap().into(),
        field: GOLDILOCKS_3,
        gap_to_radius: None,
        arithmetization: Arithmetization::None,
        lookups: vec![],
        udr_only: true,
        capacity_bound: None,
    })
    .unwrap();
    let levels = udr.security_levels();
    assert_eq!(
        levels.keys().copied().collect::<Vec<_>>(),
        [RegimeId::UniqueDecoding]
    );
}

#[test]
fn total_is_minimum_including_lookups() {
    let lookups = [(LogUpKind::Univariate, 1 << 20), (LogUpKind::Multivariate, 1 << 10)]
        .into_iter()
        .enumerate()
        .map(|(i, (kind, rows))| {
            LogUp::new(LogUpConfig {
                name: format!("lookup {i}"),
                field: GOLDILOCKS_3,
                kind,
                rows_t: rows,
                rows_l: rows,
                num_columns: 2,
                num_lookups: 4,
                alphabet_size: None,
                multilinear_fingerprint: false,
                grinding_bits: 0,
                // Dominates every other entry.
                reduction_error: if i == 1 { 3.0 * 2.0_f64.powi(-21) } else { 0.0 },
            })
            .unwrap()
        })
        .collect();
    let circuit = Circuit::new(CircuitConfig {
        name: "with lookups".to_string(),
        pcs: Fri::new(fri_config()).unwrap().into(),
        field: GOLDILOCKS_3,
        gap_to_radius: None,
        arithmetization: Arithmetization::None,
        lookups,
        udr_only: false,
        capacity_bound: None,
    })
    .unwrap();

    for table in circuit.security_levels().into_values() {
        let table = table.unwrap();
        let min = table
            .iter()
            .filter(|(label, _)| *label != "total")
            .map(|(_, bits)| bits)
            .min()
            .unwrap();
        assert_eq!(table.get("total"), Some(min));
        assert_eq!(min, 19);
        assert!(table.get("lookup 0").is_some());
    }
}

fn jagged_circuit() -> Circuit {
    let pcs = JaggedPcs::new(JaggedConfig {
        dense_pcs: FriConfig {
            rho: 0.5,
            trace_length: 1 << 20,
            field: KOALABEAR_4,
            batch_size: 1,
            num_queries: 100,
            folding_factors: vec![2; 20],
            early_stop_degree: 2,
            grinding_query_phase: 16,
            ..fri_config()
        },
        trace_height: 1 << 21,
        trace_width: 2000,
    })
    .unwrap();
    Circuit::new(CircuitConfig {
        name: "jagged".to_string(),
        pcs: pcs.into(),
        field: KOALABEAR_4,
        gap_to_radius: None,
        arithmetization: Arithmetization::Zerocheck(ZerocheckParams {
            num_constraints: 500,
            air_max_degree: 3,
        }),
        lookups: vec![],
        udr_only: true,
        capacity_bound: None,
    })
    .unwrap()
}

#[test_log::test]
fn jagged_zerocheck() {
    let circuit = jagged_circuit();
    let levels = circuit.security_levels();
    assert_eq!(levels.len(), 1);
    let udr = levels[&RegimeId::UniqueDecoding].as_ref().unwrap();
    assert!(udr.get("reduce to dense PCS").is_some());
    // Zerocheck runs over the jagged trace height: (500 + 5 * 21) / |F|.
    let zerocheck = (-(605.0 / KOALABEAR_4.size()).log2()).floor() as u32;
    assert_eq!(udr.get("zerocheck"), Some(zerocheck));
    assert!(matches!(circuit.pcs(), Pcs::Jagged(_)));
}

#[test]
fn deep_ali_slack_is_checked_per_regime() {
    let circuit = Circuit::new(CircuitConfig {
        name: "tight".to_string(),
        pcs: Fri::new(fri_config()).unwrap().into(),
        field: GOLDILOCKS_3,
        gap_to_radius: None,
        arithmetization: Arithmetization::DeepAli(DeepAliParams {
            num_constraints: 100,
            air_max_degree: 3,
            max_combo: 1024,
            grinding_deep: 0,
        }),
        lookups: vec![],
        udr_only: false,
        capacity_bound: None,
    })
    .unwrap();
    let levels = circuit.security_levels();
    match &levels[&RegimeId::UniqueDecoding] {
        Err(SoundnessError::DeepAliSlackViolated { regime, lhs, rhs }) => {
            assert_eq!(regime, "UDR");
            assert_eq!(*lhs, 2048.0);
            assert_eq!(*rhs, 1536.0);
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(matches!(
        &levels[&RegimeId::JohnsonBound],
        Err(SoundnessError::DeepAliSlackViolated { regime, .. }) if regime == "JBR"
    ));
}
