//! Console and markdown reports.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use itertools::{Either, Itertools};
use serde::{ser::SerializeMap, Serialize, Serializer};
use soundcalc::{
    circuit::CircuitSecurityLevels, security::TOTAL_LABEL, utils::KIB, Circuit, RegimeId,
    SecurityTable, SoundnessError, ZkVm,
};
use tracing::info;

use crate::utils::{markdown_anchor, report_file_name};

pub const SUMMARY_REPORT_NAME: &str = "summary.md";

const COMMIT_ROUND_PREFIX: &str = "commit round ";
const MISSING: &str = "-";

/// Security table of one regime, or the reason it could not be computed.
#[derive(Serialize)]
#[serde(untagged)]
enum RegimeLevels<'a> {
    Table(&'a SecurityTable),
    Unavailable { error: String },
}

impl<'a> From<&'a soundcalc::Result<SecurityTable>> for RegimeLevels<'a> {
    fn from(levels: &'a soundcalc::Result<SecurityTable>) -> Self {
        match levels {
            Ok(table) => Self::Table(table),
            Err(err) => Self::Unavailable {
                error: err.to_string(),
            },
        }
    }
}

/// Circuit name to per-regime levels, serialized in circuit order.
struct ZkVmLevels<'a>(Vec<(&'a str, CircuitSecurityLevels)>);

impl Serialize for ZkVmLevels<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, levels) in &self.0 {
            let levels: BTreeMap<_, _> = levels
                .iter()
                .map(|(regime, table)| (regime, RegimeLevels::from(table)))
                .collect();
            map.serialize_entry(name, &levels)?;
        }
        map.end()
    }
}

/// Security levels of every circuit of `zkvm` as pretty-printed JSON.
pub fn security_levels_json(zkvm: &ZkVm) -> Result<String> {
    let levels = ZkVmLevels(zkvm.security_levels());
    Ok(serde_json::to_string_pretty(&levels)?)
}

/// Plain text summary printed by the CLI for every analysed zkVM.
pub fn console_summary(zkvm: &ZkVm) -> Result<String> {
    let lines = [
        format!("zkVM: {}", zkvm.name()),
        String::new(),
        format!(
            "    proof size estimate: {} KiB, where 1 KiB = 1024 bytes",
            zkvm.proof_size_bits() / KIB
        ),
        format!(
            "    expected proof size: {} KiB",
            zkvm.expected_proof_size_bits() / KIB
        ),
        String::new(),
        format!("    parameters: \n{}", zkvm.parameter_summary()),
        String::new(),
        format!("    security levels (rbr): \n{}", security_levels_json(zkvm)?),
        String::new(),
    ];
    Ok(lines.join("\n"))
}

fn cell(bits: Option<u32>) -> String {
    bits.map_or_else(|| MISSING.to_string(), |bits| bits.to_string())
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// One row per regime and one column per component, `total` first. Regimes whose analysis
/// failed are listed below the table with their error.
///
/// The commit rounds of FRI are merged into a single column when every regime reports the same
/// number of bits for all of them.
pub fn security_table_markdown(levels: &CircuitSecurityLevels) -> String {
    let (tables, failures): (Vec<_>, Vec<(&RegimeId, &SoundnessError)>) =
        levels.iter().partition_map(|(regime, result)| match result {
            Ok(table) => Either::Left((regime, table)),
            Err(err) => Either::Right((regime, err)),
        });

    let mut lines = vec![];
    if !tables.is_empty() {
        lines.push(markdown_table(&tables));
    }
    if !tables.is_empty() && !failures.is_empty() {
        lines.push(String::new());
    }
    lines.extend(
        failures
            .iter()
            .map(|(regime, err)| format!("> Security levels unavailable ({regime}): {err}")),
    );
    lines.join("\n")
}

fn markdown_table(tables: &[(&RegimeId, &SecurityTable)]) -> String {
    let mut columns = vec![TOTAL_LABEL];
    for (label, _) in tables.iter().flat_map(|(_, table)| table.iter()) {
        if !columns.contains(&label) {
            columns.push(label);
        }
    }
    let commit_columns = columns
        .iter()
        .copied()
        .filter(|column| column.starts_with(COMMIT_ROUND_PREFIX))
        .collect_vec();
    let collapse = commit_columns.len() > 1
        && tables.iter().all(|(_, table)| {
            commit_columns
                .iter()
                .filter_map(|column| table.get(column))
                .all_equal()
        });

    let mut header = vec!["regime".to_string()];
    let mut rows = tables
        .iter()
        .map(|(regime, _)| vec![regime.to_string()])
        .collect_vec();
    let mut merged = false;
    for column in &columns {
        if collapse && column.starts_with(COMMIT_ROUND_PREFIX) {
            if merged {
                continue;
            }
            merged = true;
            header.push(format!("commit rounds (×{})", commit_columns.len()));
            for (row, (_, table)) in rows.iter_mut().zip(tables) {
                row.push(cell(commit_columns.iter().find_map(|c| table.get(c))));
            }
        } else {
            header.push(column.to_string());
            for (row, (_, table)) in rows.iter_mut().zip(tables) {
                row.push(cell(table.get(column)));
            }
        }
    }

    let mut lines = vec![
        markdown_row(&header),
        markdown_row(&vec!["---".to_string(); header.len()]),
    ];
    lines.extend(rows.iter().map(|row| markdown_row(row)));
    lines.join("\n")
}

fn proof_size_line(expected_bits: usize, worst_bits: usize) -> String {
    format!(
        "**Proof size:** {} KiB (expected) / {} KiB (worst case)",
        expected_bits / KIB,
        worst_bits / KIB
    )
}

fn circuit_section(circuit: &Circuit) -> Vec<String> {
    let mut lines = vec![
        format!("**Parameters ({}):**", circuit.pcs().protocol()),
        circuit.parameter_summary(),
        String::new(),
        proof_size_line(
            circuit.expected_proof_size_bits(),
            circuit.proof_size_bits(),
        ),
        String::new(),
    ];
    lines.push(security_table_markdown(&circuit.security_levels()));
    lines.push(String::new());
    lines
}

/// Detailed report of one zkVM. A zkVM with several circuits gets an overview of its weakest
/// circuits followed by one section per circuit.
pub fn zkvm_markdown(zkvm: &ZkVm) -> String {
    let mut lines = vec![
        format!("# {}", zkvm.name()),
        String::new(),
        "How to read this report:".to_string(),
        "- Table rows correspond to proximity gaps regimes".to_string(),
        "- Table columns correspond to proof system components".to_string(),
        "- Cells show bits of security per component".to_string(),
        "- Proof size estimates are indicative (1 KiB = 1024 bytes)".to_string(),
        String::new(),
    ];

    let circuits = zkvm.circuits();
    if let [circuit] = circuits.as_slice() {
        lines.extend(circuit_section(circuit));
        return lines.join("\n");
    }

    lines.push("## zkVM overview".to_string());
    lines.push(String::new());
    lines.push(proof_size_line(
        zkvm.expected_proof_size_bits(),
        zkvm.proof_size_bits(),
    ));
    lines.push(String::new());
    let weakest = zkvm.weakest_circuits();
    if weakest.is_empty() {
        lines.push("> Security levels unavailable for every circuit".to_string());
    } else {
        lines.push("| Regime | Bits of security | Weakest circuit |".to_string());
        lines.push("| --- | --- | --- |".to_string());
        for (regime, w) in &weakest {
            lines.push(format!(
                "| {regime} | **{}** | [{}](#{}) |",
                w.bits,
                w.circuit,
                markdown_anchor(&w.circuit)
            ));
        }
    }
    lines.push(String::new());

    lines.push("## Circuits".to_string());
    lines.push(String::new());
    for circuit in circuits {
        lines.push(format!(
            "- [{}](#{})",
            circuit.name(),
            markdown_anchor(circuit.name())
        ));
    }
    lines.push(String::new());

    for circuit in circuits {
        lines.push(format!("## {}", circuit.name()));
        lines.push(String::new());
        lines.extend(circuit_section(circuit));
    }
    lines.join("\n")
}

/// Comparison of several zkVMs, one row each, sorted by name.
pub fn summary_markdown(zkvms: &[ZkVm]) -> String {
    let mut lines = vec![
        "# zkVM soundness summary".to_string(),
        String::new(),
        "| zkVM | Field | Circuits | Weakest circuit | UDR (bits) | JBR (bits) | Proof size |"
            .to_string(),
        "| --- | --- | --- | --- | --- | --- | --- |".to_string(),
    ];

    for zkvm in zkvms.iter().sorted_by_key(|zkvm| zkvm.name().to_lowercase()) {
        let field = zkvm
            .circuits()
            .first()
            .map_or_else(|| MISSING.to_string(), |circuit| circuit.field().to_string());
        let weakest = zkvm.weakest_circuits();
        let bits = |regime: RegimeId| cell(weakest.get(&regime).map(|w| w.bits));
        // Ranked by JBR, the regime the presets are tuned for.
        let weakest_name = weakest
            .get(&RegimeId::JohnsonBound)
            .or_else(|| weakest.get(&RegimeId::UniqueDecoding))
            .map_or(MISSING, |w| w.circuit.as_str());
        lines.push(format!(
            "| [{}]({}) | {field} | {} | {weakest_name} | {} | {} | {} KiB |",
            zkvm.name(),
            report_file_name(zkvm.name()),
            zkvm.circuits().len(),
            bits(RegimeId::UniqueDecoding),
            bits(RegimeId::JohnsonBound),
            zkvm.proof_size_bits() / KIB,
        ));
    }

    lines.extend([
        String::new(),
        "- **UDR**: unique decoding regime".to_string(),
        "- **JBR**: Johnson bound regime".to_string(),
        "- **Weakest circuit**: circuit with the lowest JBR security level".to_string(),
        "- **Proof size**: sum over all circuits, 1 KiB = 1024 bytes".to_string(),
        String::new(),
    ]);
    lines.join("\n")
}

/// Writes one report per zkVM and [SUMMARY_REPORT_NAME] into `dir`, returning the written paths.
pub fn write_reports(zkvms: &[ZkVm], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).wrap_err_with(|| format!("creating {}", dir.display()))?;

    let reports = zkvms
        .iter()
        .map(|zkvm| (report_file_name(zkvm.name()), zkvm_markdown(zkvm)))
        .chain([(SUMMARY_REPORT_NAME.to_string(), summary_markdown(zkvms))]);
    let mut written = Vec::new();
    for (file_name, contents) in reports {
        let path = dir.join(file_name);
        fs::write(&path, contents).wrap_err_with(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, u32)]) -> soundcalc::Result<SecurityTable> {
        let mut table = SecurityTable::new();
        for &(label, bits) in entries {
            table.insert(label, bits).unwrap();
        }
        table.seal()
    }

    #[test]
    fn equal_commit_rounds_collapse() {
        let levels = CircuitSecurityLevels::from([
            (
                RegimeId::UniqueDecoding,
                table(&[("batching", 120), ("commit round 1", 110), ("commit round 2", 110)]),
            ),
            (
                RegimeId::JohnsonBound,
                table(&[("batching", 100), ("commit round 1", 90), ("commit round 2", 90)]),
            ),
        ]);
        let md = security_table_markdown(&levels);
        let lines = md.lines().collect_vec();
        assert_eq!(lines[0], "| regime | total | batching | commit rounds (×2) |");
        assert_eq!(lines[1], "| --- | --- | --- | --- |");
        assert_eq!(lines[2], "| UDR | 110 | 120 | 110 |");
        assert_eq!(lines[3], "| JBR | 90 | 100 | 90 |");
    }

    #[test]
    fn distinct_commit_rounds_stay() {
        let levels = CircuitSecurityLevels::from([(
            RegimeId::UniqueDecoding,
            table(&[("commit round 1", 110), ("commit round 2", 111)]),
        )]);
        let md = security_table_markdown(&levels);
        assert!(md.starts_with("| regime | total | commit round 1 | commit round 2 |"));
    }

    #[test]
    fn missing_entries_are_marked() {
        let levels = CircuitSecurityLevels::from([
            (RegimeId::UniqueDecoding, table(&[("ALI", 100)])),
            (RegimeId::JohnsonBound, table(&[("DEEP", 90)])),
        ]);
        let md = security_table_markdown(&levels);
        assert!(md.contains("| UDR | 100 | 100 | - |"));
        assert!(md.contains("| JBR | 90 | - | 90 |"));
    }

    #[test]
    fn failed_regime_is_listed_below_the_table() {
        let levels = CircuitSecurityLevels::from([
            (RegimeId::UniqueDecoding, table(&[("ALI", 100)])),
            (
                RegimeId::JohnsonBound,
                Err(SoundnessError::JohnsonBoundInfeasible {
                    theta: 0.484375,
                    bound: 0.466,
                    rho_plus: 0.285,
                }),
            ),
        ]);
        let md = security_table_markdown(&levels);
        let lines = md.lines().collect_vec();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "| UDR | 100 | 100 |");
        assert_eq!(lines[3], "");
        assert!(lines[4].starts_with("> Security levels unavailable (JBR): "));
    }

    #[test]
    fn failed_regime_serializes_its_error() {
        let levels = CircuitSecurityLevels::from([
            (RegimeId::UniqueDecoding, table(&[("ALI", 100)])),
            (RegimeId::JohnsonBound, Err(SoundnessError::UnfinishedModel("WHIR"))),
        ]);
        let json = serde_json::to_value(ZkVmLevels(vec![("main", levels)])).unwrap();
        assert_eq!(json["main"]["UDR"]["total"], 100);
        assert_eq!(
            json["main"]["JBR"]["error"],
            SoundnessError::UnfinishedModel("WHIR").to_string()
        );
    }
}
