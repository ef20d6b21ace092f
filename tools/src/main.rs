//! Offline variant-table diagnostic.
//!
//! Loads the code table and the simplified/traditional table and reports
//! the data-quality issues the runtime deliberately does not repair:
//! construction-time conflicts, mappings whose endpoints are missing from
//! the code table, and directional asymmetries (an s2t entry whose reverse
//! is absent or points elsewhere, and vice versa).

use anyhow::Result;
use clap::Parser;
use libcangjie_core::{CodeTable, VariantTable};
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// Cangjie code dictionary (.txt/.table, .json or .bin)
    #[arg(long)]
    code_table: PathBuf,

    /// Variant table JSON ({ "s2t": {..}, "t2s": {..} })
    #[arg(long)]
    variant_table: PathBuf,

    /// How many examples to print per issue category
    #[arg(long, default_value_t = 10)]
    show: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let codes = CodeTable::from_path(&args.code_table)?;
    let variants = VariantTable::from_json_path(&args.variant_table)?;

    println!(
        "Loaded {} characters, {} s2t / {} t2s mappings",
        codes.len(),
        variants.s2t_len(),
        variants.t2s_len()
    );

    // Conflicts the first-mapping-wins policy recorded at load time.
    let conflicts = variants.conflicts();
    println!("\nConstruction conflicts: {}", conflicts.len());
    for c in conflicts.iter().take(args.show) {
        println!(
            "  [{}] {} → {} (kept), {} (rejected)",
            c.direction, c.from, c.kept, c.rejected
        );
    }

    // Mappings pointing outside the code table.
    let mut unresolvable = Vec::new();
    for (from, to) in variants.s2t_entries() {
        if !codes.contains(from) || !codes.contains(to) {
            unresolvable.push(("s2t", from, to));
        }
    }
    for (from, to) in variants.t2s_entries() {
        if !codes.contains(from) || !codes.contains(to) {
            unresolvable.push(("t2s", from, to));
        }
    }
    println!("\nMappings outside the code table: {}", unresolvable.len());
    for (dir, from, to) in unresolvable.iter().take(args.show) {
        println!("  [{}] {} → {}", dir, from, to);
    }

    // Directional asymmetries: missing or disagreeing reverse mappings.
    let mut asymmetries = Vec::new();
    for (simp, trad) in variants.s2t_entries() {
        match variants.simplified_for(trad) {
            None => asymmetries.push(format!("s2t {} → {}: no reverse t2s entry", simp, trad)),
            Some(back) if back != simp => asymmetries.push(format!(
                "s2t {} → {}: reverse t2s[{}] = {}",
                simp, trad, trad, back
            )),
            Some(_) => {}
        }
    }
    for (trad, simp) in variants.t2s_entries() {
        match variants.traditional_for(simp) {
            None => asymmetries.push(format!("t2s {} → {}: no reverse s2t entry", trad, simp)),
            Some(back) if back != trad => asymmetries.push(format!(
                "t2s {} → {}: reverse s2t[{}] = {}",
                trad, simp, simp, back
            )),
            Some(_) => {}
        }
    }
    println!("\nDirectional asymmetries: {}", asymmetries.len());
    for line in asymmetries.iter().take(args.show) {
        println!("  {}", line);
    }

    let total = conflicts.len() + unresolvable.len() + asymmetries.len();
    if total == 0 {
        println!("\nNo variant-table issues found");
    } else {
        println!("\n{} issue(s) found", total);
    }
    Ok(())
}
