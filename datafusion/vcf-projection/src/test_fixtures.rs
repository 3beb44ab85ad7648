//! Helpers for building headers and records from VCF text in unit tests.

use noodles::vcf::{self, Header};
use std::io::Write;
use tempfile::NamedTempFile;

pub(crate) fn parse_header(text: &str) -> Header {
    let mut reader = vcf::io::Reader::new(text.as_bytes());
    reader.read_header().expect("valid VCF header")
}

pub(crate) fn parse_records(text: &str) -> (Header, Vec<vcf::Record>) {
    let mut reader = vcf::io::Reader::new(text.as_bytes());
    let header = reader.read_header().expect("valid VCF header");
    let mut records = Vec::new();
    let mut record = vcf::Record::default();
    while reader.read_record(&mut record).expect("readable record") != 0 {
        records.push(record.clone());
    }
    (header, records)
}

pub(crate) fn write_vcf(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".vcf").expect("temp file");
    file.write_all(text.as_bytes()).expect("write VCF");
    file.flush().expect("flush VCF");
    file
}

pub(crate) fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}
