//! Projection pushdown tests.
//!
//! Tests verify both execution plan analysis (no ProjectionExec wrapper, correct
//! leaf exec schema) and data correctness when projecting subsets of columns.

use datafusion::arrow::array::{Array, Float64Array, Int64Array, StringArray};
use datafusion::prelude::*;
use datafusion_vcf_projection::VcfTableProvider;
use datafusion_vcf_projection_core::test_utils::{assert_plan_projection, find_leaf_exec};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

const SAMPLE_VCF_CONTENT: &str = r#"##fileformat=VCFv4.2
##INFO=<ID=DP,Number=1,Type=Integer,Description="Total Depth">
##INFO=<ID=AF,Number=A,Type=Float,Description="Allele Frequency">
##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">
##contig=<ID=chr1>
#CHROM	POS	ID	REF	ALT	QUAL	FILTER	INFO
chr1	100	rs1	A	G	30	PASS	DP=10;AF=0.5
chr1	200	rs2	C	T	40	PASS	DP=20;AF=0.3
chr1	300	.	G	A	50	PASS	DP=15;AF=0.7
"#;

async fn setup_vcf_ctx(table_name: &str) -> Result<(SessionContext, TempDir), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("projection.vcf");
    fs::write(&path, SAMPLE_VCF_CONTENT).await?;

    let table = VcfTableProvider::new(
        path.to_string_lossy().into_owned(),
        Some(vec!["DP".to_string(), "AF".to_string()]),
    )?;
    let ctx = SessionContext::new();
    ctx.register_table(table_name, Arc::new(table))?;
    Ok((ctx, dir))
}

// ── Plan analysis tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_vcf_plan_single_column_projection() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let df = ctx.sql("SELECT chrom FROM t").await?;
    let plan = df.create_physical_plan().await?;
    assert_plan_projection(&plan, "VcfExec", &["chrom"]);
    Ok(())
}

#[tokio::test]
async fn test_vcf_plan_info_column_projection() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let df = ctx.sql(r#"SELECT pos, "info_AF" FROM t"#).await?;
    let plan = df.create_physical_plan().await?;
    assert_plan_projection(&plan, "VcfExec", &["pos", "info_AF"]);
    Ok(())
}

#[tokio::test]
async fn test_vcf_plan_no_projection_select_star() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let df = ctx.sql("SELECT * FROM t").await?;
    let plan = df.create_physical_plan().await?;
    let leaf = find_leaf_exec(&plan);
    assert_eq!(leaf.name(), "VcfExec");
    assert_eq!(leaf.schema().fields().len(), 9);
    Ok(())
}

// ── Data correctness tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_vcf_projection_info_only() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let batches = ctx
        .sql(r#"SELECT "info_DP" FROM t"#)
        .await?
        .collect()
        .await?;
    let batch = &batches[0];
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.schema().field(0).name(), "info_DP");
    let dp = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(dp.values().to_vec(), vec![10, 20, 15]);
    Ok(())
}

#[tokio::test]
async fn test_vcf_projection_reordered_columns() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let batches = ctx
        .sql(r#"SELECT "info_AF", id, chrom FROM t"#)
        .await?
        .collect()
        .await?;
    let batch = &batches[0];
    assert_eq!(batch.num_columns(), 3);

    let af = batch.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
    let id = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
    let chrom = batch.column(2).as_any().downcast_ref::<StringArray>().unwrap();
    assert!((af.value(1) - 0.3).abs() < 1e-6);
    assert_eq!(id.value(0), "rs1");
    assert!(id.is_null(2));
    assert_eq!(chrom.value(2), "chr1");
    Ok(())
}

#[tokio::test]
async fn test_vcf_projection_with_limit() -> Result<(), Box<dyn std::error::Error>> {
    let (ctx, _dir) = setup_vcf_ctx("t").await?;
    let df = ctx.sql("SELECT pos FROM t LIMIT 2").await?;
    let plan = df.clone().create_physical_plan().await?;
    let leaf = find_leaf_exec(&plan);
    assert_eq!(leaf.name(), "VcfExec");

    let batches = df.collect().await?;
    let pos: Vec<i64> = batches
        .iter()
        .flat_map(|b| {
            b.column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .unwrap()
                .values()
                .to_vec()
        })
        .collect();
    assert_eq!(pos, vec![99, 199]);
    Ok(())
}
