//! CIDR membership: `iir` (in IP range) and `niir` (not in IP range).
//!
//! Targets are IPv4 CIDR strings (a bare address is a /32). They expand to
//! inclusive `u32` ranges at prepare time; the variable must resolve to an
//! IPv4 address string at run time.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use serde_json::Value;

use super::{shape_error, Operation, Prepared};
use crate::eval::Eval;
use crate::types::error::{BuildError, EvalError};
use crate::types::subject::Subject;
use crate::vars::Variable;

fn parse_cidr(s: &str) -> Result<RangeInclusive<u32>, String> {
    let s = s.trim();
    match s.split_once('/') {
        Some((addr, prefix)) => {
            let ip: Ipv4Addr = addr
                .parse()
                .map_err(|_| format!("'{addr}' is not an IPv4 address"))?;
            let bits: u32 = prefix
                .parse()
                .map_err(|_| format!("'{prefix}' is not a prefix length"))?;
            if bits > 32 {
                return Err(format!("prefix length {bits} out of range"));
            }
            let mask = if bits == 0 { 0 } else { u32::MAX << (32 - bits) };
            let lo = u32::from(ip) & mask;
            Ok(lo..=(lo | !mask))
        }
        None => {
            let ip: Ipv4Addr = s.parse().map_err(|_| format!("'{s}' is not an IPv4 address"))?;
            let n = u32::from(ip);
            Ok(n..=n)
        }
    }
}

pub(crate) struct IpWithin {
    name: &'static str,
    negate: bool,
}

impl IpWithin {
    pub(crate) fn new(name: &'static str, negate: bool) -> Self {
        Self { name, negate }
    }
}

impl Operation for IpWithin {
    fn name(&self) -> &str {
        self.name
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, BuildError> {
        let targets: Vec<&str> = match raw {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => {
                let mut targets = Vec::with_capacity(items.len());
                for item in items {
                    targets.push(item.as_str().ok_or_else(|| BuildError::InvalidOperand {
                        operation: self.name.to_owned(),
                        detail: "CIDR targets must be strings".to_owned(),
                    })?);
                }
                targets
            }
            _ => {
                return Err(BuildError::InvalidOperand {
                    operation: self.name.to_owned(),
                    detail: "expected a CIDR string or an array of them".to_owned(),
                })
            }
        };
        if targets.is_empty() {
            return Err(BuildError::InvalidOperand {
                operation: self.name.to_owned(),
                detail: "expected at least one CIDR".to_owned(),
            });
        }
        let ranges = targets
            .into_iter()
            .map(|t| {
                parse_cidr(t).map_err(|detail| BuildError::InvalidOperand {
                    operation: self.name.to_owned(),
                    detail,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Prepared::IpRanges(ranges))
    }

    fn test(
        &self,
        ev: &Eval<'_>,
        subject: &dyn Subject,
        variable: &dyn Variable,
        prepared: &Prepared,
    ) -> Result<bool, EvalError> {
        let value = ev.resolve(variable, subject)?;
        let Prepared::IpRanges(ranges) = prepared else {
            return Err(shape_error(self.name));
        };
        let text = value.as_str().ok_or_else(|| EvalError::Operand {
            operation: self.name.to_owned(),
            detail: "variable must resolve to an IP string".to_owned(),
        })?;
        let ip: Ipv4Addr = text.trim().parse().map_err(|_| EvalError::Operand {
            operation: self.name.to_owned(),
            detail: format!("'{text}' is not an IPv4 address"),
        })?;
        let n = u32::from(ip);
        let hit = ranges.iter().any(|r| r.contains(&n));
        Ok(hit != self.negate)
    }
}
