//! BCF input is detected from content and yields the same rows as VCF text.

use datafusion::arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use datafusion::prelude::*;
use datafusion_vcf_projection::VcfTableProvider;
use noodles::bcf;
use noodles::vcf;
use noodles::vcf::variant::io::Write as _;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLE_VCF_CONTENT: &str = r#"##fileformat=VCFv4.3
##contig=<ID=chr1,length=248956422>
##contig=<ID=chr2,length=242193529>
##FILTER=<ID=PASS,Description="All filters passed">
##FILTER=<ID=q10,Description="Quality below 10">
##INFO=<ID=DP,Number=1,Type=Integer,Description="Combined depth">
##INFO=<ID=AF,Number=A,Type=Float,Description="Allele frequency">
##INFO=<ID=DB,Number=0,Type=Flag,Description="dbSNP membership">
#CHROM	POS	ID	REF	ALT	QUAL	FILTER	INFO
chr1	100	rs1	A	G	50	PASS	DP=10;AF=0.5;DB
chr1	200	.	C	T,A	.	q10	DP=3;AF=0.25,0.75
chr2	300	.	G	T	12.5	PASS	.
"#;

fn write_bcf(path: &Path, text: &str) -> std::io::Result<()> {
    let mut reader = vcf::io::Reader::new(text.as_bytes());
    let header = reader.read_header()?;

    let mut writer = bcf::io::Writer::new(File::create(path)?);
    writer.write_variant_header(&header)?;
    let mut record = vcf::Record::default();
    while reader.read_record(&mut record)? != 0 {
        writer.write_variant_record(&header, &record)?;
    }
    // dropping the writer flushes the final BGZF block
    drop(writer);
    Ok(())
}

#[tokio::test]
async fn test_bcf_matches_vcf_text() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let bcf_path = dir.path().join("sample.bcf");
    write_bcf(&bcf_path, SAMPLE_VCF_CONTENT)?;

    let table = VcfTableProvider::new(
        bcf_path.to_string_lossy().into_owned(),
        Some(vec!["DP".to_string(), "AF".to_string(), "DB".to_string()]),
    )?;
    let ctx = SessionContext::new();
    ctx.register_table("variants", Arc::new(table))?;

    let batches = ctx
        .sql(r#"SELECT chrom, pos, alt, qual, filter, "info_DP", "info_AF", "info_DB" FROM variants"#)
        .await?
        .collect()
        .await?;
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 3);

    let chrom = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
    let pos = batch.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
    let alt = batch.column(2).as_any().downcast_ref::<StringArray>().unwrap();
    let qual = batch.column(3).as_any().downcast_ref::<Float64Array>().unwrap();
    let filter = batch.column(4).as_any().downcast_ref::<StringArray>().unwrap();
    let dp = batch.column(5).as_any().downcast_ref::<Int64Array>().unwrap();
    let af = batch.column(6).as_any().downcast_ref::<Float64Array>().unwrap();
    let db = batch.column(7).as_any().downcast_ref::<BooleanArray>().unwrap();

    assert_eq!(chrom.value(0), "chr1");
    assert_eq!(chrom.value(2), "chr2");
    assert_eq!(pos.value(1), 199);
    assert_eq!(alt.value(1), "T,A");
    assert_eq!(qual.value(0), 50.0);
    assert!(qual.is_null(1));
    assert_eq!(filter.value(0), "PASS");
    assert_eq!(filter.value(1), "q10");
    assert_eq!(dp.value(0), 10);
    assert!(dp.is_null(2));
    assert_eq!(af.value(1), 0.25);
    assert!(db.value(0));
    assert!(db.is_null(1));
    Ok(())
}
