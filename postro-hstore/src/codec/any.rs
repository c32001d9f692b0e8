//! Planning against `dyn Any`, for drivers which only know values at runtime.
use bytes::{BufMut, Bytes};
use std::{any::Any, collections::HashMap};

use super::{DecodeError, EncodePlan, EncodeError, HstoreCodec, IsNull, ScanPlan};
use crate::{common::ByteStr, hstore::Hstore, postgres::PgFormat};

macro_rules! targets {
    ($($name:ident: $ty:ty,)*) => {
        /// Concrete hstore type behind `dyn Any`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Target {
            $($name),*
        }

        impl Target {
            fn of(any: &dyn Any) -> Option<Target> {
                $(
                    if any.is::<$ty>() {
                        return Some(Target::$name);
                    }
                )*
                None
            }

            fn encode<B: BufMut>(
                self,
                format: PgFormat,
                any: &dyn Any,
                buf: &mut B,
            ) -> Result<IsNull, EncodeError> {
                match self {
                    $(
                        Target::$name => {
                            let value = any.downcast_ref::<$ty>().ok_or(EncodeError::PlanMismatch)?;
                            EncodePlan::<$ty>::new(format).encode(value, buf)
                        },
                    )*
                }
            }

            fn scan(
                self,
                format: PgFormat,
                src: Option<Bytes>,
                any: &mut dyn Any,
            ) -> Result<(), DecodeError> {
                match self {
                    $(
                        Target::$name => {
                            let dst = any.downcast_mut::<$ty>().ok_or(DecodeError::PlanMismatch)?;
                            ScanPlan::<$ty>::new(format).scan(src, dst)
                        },
                    )*
                }
            }
        }
    };
}

targets! {
    Compact: Hstore<ByteStr>,
    Compat: Hstore<String>,
    Map: HashMap<String, Option<String>>,
    NullableCompact: Option<Hstore<ByteStr>>,
    NullableCompat: Option<Hstore<String>>,
    NullableMap: Option<HashMap<String, Option<String>>>,
}

impl HstoreCodec {
    /// Plan encoding of a runtime value.
    ///
    /// Returns [`None`] if format code is unknown or `value` is not an hstore type.
    pub fn plan_encode_any(&self, format_code: i16, value: &dyn Any) -> Option<AnyEncodePlan> {
        Some(AnyEncodePlan {
            format: PgFormat::from_code(format_code)?,
            target: Target::of(value)?,
        })
    }

    /// Plan scanning into a runtime target.
    ///
    /// Returns [`None`] if format code is unknown or `target` is not an hstore type.
    pub fn plan_scan_any(&self, format_code: i16, target: &dyn Any) -> Option<AnyScanPlan> {
        Some(AnyScanPlan {
            format: PgFormat::from_code(format_code)?,
            target: Target::of(target)?,
        })
    }
}

/// Encode plan created by [`HstoreCodec::plan_encode_any`].
#[derive(Debug, Clone, Copy)]
pub struct AnyEncodePlan {
    format: PgFormat,
    target: Target,
}

impl AnyEncodePlan {
    /// Returns planned format.
    pub fn format(&self) -> PgFormat {
        self.format
    }

    /// Encode value into `buf`.
    ///
    /// Returns [`EncodeError::PlanMismatch`] if `value` type is not the planned type.
    pub fn encode<B: BufMut>(&self, value: &dyn Any, buf: &mut B) -> Result<IsNull, EncodeError> {
        self.target.encode(self.format, value, buf)
    }
}

/// Scan plan created by [`HstoreCodec::plan_scan_any`].
#[derive(Debug, Clone, Copy)]
pub struct AnyScanPlan {
    format: PgFormat,
    target: Target,
}

impl AnyScanPlan {
    /// Returns planned format.
    pub fn format(&self) -> PgFormat {
        self.format
    }

    /// Decode `src` into `dst`.
    ///
    /// Returns [`DecodeError::PlanMismatch`] if `dst` type is not the planned type.
    pub fn scan(&self, src: Option<Bytes>, dst: &mut dyn Any) -> Result<(), DecodeError> {
        self.target.scan(self.format, src, dst)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hstore::HstoreCompat;

    const CODEC: HstoreCodec = HstoreCodec::new(16_400);

    #[test]
    fn plan_known_types() {
        assert!(CODEC.plan_encode_any(0, &Hstore::<ByteStr>::new()).is_some());
        assert!(CODEC.plan_encode_any(1, &HstoreCompat::new()).is_some());
        assert!(CODEC.plan_encode_any(1, &HashMap::<String, Option<String>>::new()).is_some());
        assert!(CODEC.plan_encode_any(1, &None::<HstoreCompat>).is_some());
        assert!(CODEC.plan_scan_any(0, &None::<Hstore>).is_some());
    }

    #[test]
    fn reject_other_types() {
        assert!(CODEC.plan_encode_any(0, &String::new()).is_none());
        assert!(CODEC.plan_encode_any(0, &HashMap::<String, String>::new()).is_none());
        assert!(CODEC.plan_scan_any(1, &0_i32).is_none());
        // unknown format
        assert!(CODEC.plan_encode_any(2, &Hstore::<ByteStr>::new()).is_none());
    }

    #[test]
    fn encode_and_scan() {
        let value: Hstore = [("k", Some("v")), ("n", None)].into_iter().collect();
        let plan = CODEC.plan_encode_any(1, &value).unwrap();
        assert_eq!(plan.format(), PgFormat::Binary);

        let mut buf = Vec::<u8>::new();
        assert_eq!(plan.encode(&value, &mut buf).unwrap(), IsNull::No);

        let mut out = None::<HstoreCompat>;
        let plan = CODEC.plan_scan_any(1, &out).unwrap();
        plan.scan(Some(Bytes::from(buf)), &mut out).unwrap();
        assert_eq!(out.map(Hstore::<ByteStr>::from), Some(value));
    }

    #[test]
    fn plan_mismatch() {
        let plan = CODEC.plan_encode_any(0, &Hstore::<ByteStr>::new()).unwrap();
        let err = plan.encode(&HstoreCompat::new(), &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, EncodeError::PlanMismatch));

        let plan = CODEC.plan_scan_any(0, &Hstore::<ByteStr>::new()).unwrap();
        let err = plan.scan(None, &mut 0_i32).unwrap_err();
        assert!(matches!(err, DecodeError::PlanMismatch));
    }
}
