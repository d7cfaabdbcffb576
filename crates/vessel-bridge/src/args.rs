//! Positional arguments for bridge messages.
//!
//! Every argument must survive a JSON round trip unchanged. serde_json
//! writes NaN and infinities as `null`, so floats are checked before
//! conversion.

use std::fmt;

use serde::ser::{self, Serialize};
use serde_json::Value;
use vessel_common::{BridgeError, Channel};

/// Values that can be sent as the argument list of one message.
///
/// Tuples give one argument per element and `()` gives none. A `Vec<Value>`
/// or `[Value]` is taken as the argument list itself. A single `str`,
/// `String` or [`Value`] is one argument, so `Value::Null` stays a single
/// `null`. Send one list argument as a 1-tuple: `(vec![1, 2],)`.
pub trait BridgeArgs {
    fn to_args(&self, channel: Channel) -> Result<Vec<Value>, BridgeError>;
}

/// Pack `args` for `channel`, rejecting anything that is not transport-safe.
pub fn to_args<A: BridgeArgs + ?Sized>(channel: Channel, args: &A) -> Result<Vec<Value>, BridgeError> {
    args.to_args(channel)
}

/// Convert one argument. Fails for non-finite floats, non-string map keys
/// and types whose `Serialize` impl refuses.
pub fn to_arg<T: Serialize + ?Sized>(channel: Channel, arg: &T) -> Result<Value, BridgeError> {
    let unsafe_arg = |reason: String| BridgeError::NotTransportSafe { channel, reason };
    arg.serialize(FiniteCheck).map_err(|e| unsafe_arg(e.0))?;
    serde_json::to_value(arg).map_err(|e| unsafe_arg(e.to_string()))
}

impl BridgeArgs for () {
    fn to_args(&self, _channel: Channel) -> Result<Vec<Value>, BridgeError> {
        Ok(Vec::new())
    }
}

impl BridgeArgs for str {
    fn to_args(&self, _channel: Channel) -> Result<Vec<Value>, BridgeError> {
        Ok(vec![Value::String(self.to_owned())])
    }
}

impl BridgeArgs for String {
    fn to_args(&self, channel: Channel) -> Result<Vec<Value>, BridgeError> {
        self.as_str().to_args(channel)
    }
}

impl BridgeArgs for Value {
    fn to_args(&self, _channel: Channel) -> Result<Vec<Value>, BridgeError> {
        Ok(vec![self.clone()])
    }
}

// A `Value` can never hold a non-finite number.
impl BridgeArgs for [Value] {
    fn to_args(&self, _channel: Channel) -> Result<Vec<Value>, BridgeError> {
        Ok(self.to_vec())
    }
}

impl BridgeArgs for Vec<Value> {
    fn to_args(&self, channel: Channel) -> Result<Vec<Value>, BridgeError> {
        self.as_slice().to_args(channel)
    }
}

macro_rules! tuple_args {
    ($($name:ident)+) => {
        impl<$($name: Serialize),+> BridgeArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_args(&self, channel: Channel) -> Result<Vec<Value>, BridgeError> {
                let ($($name,)+) = self;
                Ok(vec![$(to_arg(channel, $name)?),+])
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A B);
tuple_args!(A B C);
tuple_args!(A B C D);
tuple_args!(A B C D E);
tuple_args!(A B C D E F);

#[derive(Debug)]
struct NotFinite(String);

impl fmt::Display for NotFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NotFinite {}

impl ser::Error for NotFinite {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        NotFinite(msg.to_string())
    }
}

/// Walks a value and fails on the first NaN or infinity. Everything else
/// is accepted; serde_json reports its own errors afterwards.
struct FiniteCheck;

type Checked = Result<(), NotFinite>;

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Checked {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Checked {
        if v.is_finite() {
            Ok(())
        } else {
            Err(NotFinite(format!("{v} is not a finite number")))
        }
    }

    fn serialize_bool(self, _v: bool) -> Checked {
        Ok(())
    }
    fn serialize_i8(self, _v: i8) -> Checked {
        Ok(())
    }
    fn serialize_i16(self, _v: i16) -> Checked {
        Ok(())
    }
    fn serialize_i32(self, _v: i32) -> Checked {
        Ok(())
    }
    fn serialize_i64(self, _v: i64) -> Checked {
        Ok(())
    }
    fn serialize_i128(self, _v: i128) -> Checked {
        Ok(())
    }
    fn serialize_u8(self, _v: u8) -> Checked {
        Ok(())
    }
    fn serialize_u16(self, _v: u16) -> Checked {
        Ok(())
    }
    fn serialize_u32(self, _v: u32) -> Checked {
        Ok(())
    }
    fn serialize_u64(self, _v: u64) -> Checked {
        Ok(())
    }
    fn serialize_u128(self, _v: u128) -> Checked {
        Ok(())
    }
    fn serialize_char(self, _v: char) -> Checked {
        Ok(())
    }
    fn serialize_str(self, _v: &str) -> Checked {
        Ok(())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Checked {
        Ok(())
    }
    fn serialize_none(self) -> Checked {
        Ok(())
    }
    fn serialize_unit(self) -> Checked {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Checked {
        Ok(())
    }
    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Checked {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Checked {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NotFinite> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NotFinite> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Checked {
        key.serialize(FiniteCheck)
    }
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = NotFinite;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Checked {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Serialize, Serializer};
    use serde_json::json;
    use std::collections::HashMap;

    struct LiveHandle;

    impl Serialize for LiveHandle {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("live handles cannot cross the bridge"))
        }
    }

    #[derive(Serialize)]
    struct Sample {
        label: &'static str,
        readings: Vec<f64>,
    }

    fn rejected(result: Result<Vec<Value>, BridgeError>) -> String {
        match result {
            Err(BridgeError::NotTransportSafe { channel, reason }) => {
                assert_eq!(channel, Channel::IpcExample);
                reason
            }
            other => panic!("expected NotTransportSafe, got {other:?}"),
        }
    }

    #[test]
    fn tuples_spread_one_arg_per_element() {
        let args = to_args(Channel::IpcExample, &("ping", 3, true)).unwrap();
        assert_eq!(args, vec![json!("ping"), json!(3), json!(true)]);
    }

    #[test]
    fn unit_is_no_args() {
        assert!(to_args(Channel::IpcExample, &()).unwrap().is_empty());
    }

    #[test]
    fn strings_are_one_arg() {
        assert_eq!(to_args(Channel::IpcExample, "ping").unwrap(), vec![json!("ping")]);
        let owned = String::from("pong");
        assert_eq!(to_args(Channel::IpcExample, &owned).unwrap(), vec![json!("pong")]);
    }

    #[test]
    fn null_stays_a_single_arg() {
        assert_eq!(to_args(Channel::IpcExample, &Value::Null).unwrap(), vec![Value::Null]);
        assert_eq!(
            to_args(Channel::IpcExample, &(None::<String>,)).unwrap(),
            vec![Value::Null]
        );
    }

    #[test]
    fn list_in_a_tuple_is_one_arg() {
        let args = to_args(Channel::IpcExample, &(vec![1, 2],)).unwrap();
        assert_eq!(args, vec![json!([1, 2])]);

        let args = to_args(Channel::IpcExample, &json!([1, 2])).unwrap();
        assert_eq!(args, vec![json!([1, 2])]);
    }

    #[test]
    fn value_vec_is_the_arg_list() {
        let args = to_args(Channel::IpcExample, &vec![json!("a"), Value::Null]).unwrap();
        assert_eq!(args, vec![json!("a"), Value::Null]);
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let reason = rejected(to_args(Channel::IpcExample, &(f64::NAN, f64::INFINITY)));
        assert!(reason.contains("NaN"), "{reason}");

        rejected(to_args(Channel::IpcExample, &(f32::NEG_INFINITY,)));
    }

    #[test]
    fn nested_non_finite_numbers_are_rejected() {
        let sample = Sample {
            label: "sensor",
            readings: vec![1.5, f64::NAN],
        };
        rejected(to_args(Channel::IpcExample, &("reading", sample)));

        let mut by_name = HashMap::new();
        by_name.insert("max", f64::INFINITY);
        rejected(to_args(Channel::IpcExample, &(Some(by_name),)));
    }

    #[test]
    fn finite_floats_pass() {
        let sample = Sample {
            label: "ok",
            readings: vec![0.25, -3.0],
        };
        let args = to_args(Channel::IpcExample, &(sample,)).unwrap();
        assert_eq!(args, vec![json!({"label": "ok", "readings": [0.25, -3.0]})]);
    }

    #[test]
    fn live_handles_are_rejected() {
        let reason = rejected(to_args(Channel::IpcExample, &("ping", LiveHandle)));
        assert!(reason.contains("live handles"));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "tuple key");
        rejected(to_args(Channel::IpcExample, &(map,)));
    }
}
