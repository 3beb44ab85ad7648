//! `read_vcf(path [, info_cols])` table function for SQL.

use crate::header_resolver::parse_info_columns;
use crate::table_provider::VcfTableProvider;
use datafusion::catalog::{TableFunctionImpl, TableProvider};
use datafusion::common::{ScalarValue, plan_err};
use datafusion::logical_expr::Expr;
use datafusion::prelude::SessionContext;
use log::debug;
use std::sync::Arc;

/// Name the table function is registered under
pub const READ_VCF_FUNCTION_NAME: &str = "read_vcf";

/// Table function binding a [`VcfTableProvider`] from SQL.
///
/// ```sql
/// SELECT chrom, pos, info_DP FROM read_vcf('variants.vcf.gz', 'DP,AF');
/// ```
///
/// The optional second argument is a comma-separated list of INFO fields.
#[derive(Debug, Default)]
pub struct ReadVcfFunction;

fn string_literal(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Literal(ScalarValue::Utf8(Some(s)), ..)
        | Expr::Literal(ScalarValue::LargeUtf8(Some(s)), ..)
        | Expr::Literal(ScalarValue::Utf8View(Some(s)), ..) => Some(s.as_str()),
        _ => None,
    }
}

impl TableFunctionImpl for ReadVcfFunction {
    fn call(&self, args: &[Expr]) -> datafusion::common::Result<Arc<dyn TableProvider>> {
        let (path, info_cols) = match args {
            [path] => (path, None),
            [path, info_cols] => (path, Some(info_cols)),
            _ => {
                return plan_err!(
                    "{READ_VCF_FUNCTION_NAME} expects a path and an optional INFO column list, got {} arguments",
                    args.len()
                );
            }
        };

        let Some(path) = string_literal(path) else {
            return plan_err!("{READ_VCF_FUNCTION_NAME}: path must be a string literal");
        };
        let info_fields = match info_cols {
            None => None,
            Some(expr) => match string_literal(expr) {
                Some(list) => Some(parse_info_columns(list)),
                None => {
                    return plan_err!(
                        "{READ_VCF_FUNCTION_NAME}: INFO column list must be a string literal"
                    );
                }
            },
        };

        debug!("{READ_VCF_FUNCTION_NAME}({path}, {info_fields:?})");
        Ok(Arc::new(VcfTableProvider::new(path.to_string(), info_fields)?))
    }
}

/// Registers [`ReadVcfFunction`] on `ctx` as `read_vcf`
pub fn register_read_vcf(ctx: &SessionContext) {
    ctx.register_udtf(READ_VCF_FUNCTION_NAME, Arc::new(ReadVcfFunction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::prelude::lit;

    #[test]
    fn test_rejects_wrong_arity() {
        let err = ReadVcfFunction.call(&[]).unwrap_err();
        assert!(err.to_string().contains("expects a path"));
    }

    #[test]
    fn test_rejects_non_string_path() {
        let err = ReadVcfFunction.call(&[lit(42)]).unwrap_err();
        assert!(err.to_string().contains("path must be a string literal"));
    }

    #[test]
    fn test_missing_file_fails_at_bind() {
        let err = ReadVcfFunction
            .call(&[lit("/nonexistent/input.vcf")])
            .unwrap_err();
        assert!(err.to_string().contains("Could not open VCF file"));
    }
}
