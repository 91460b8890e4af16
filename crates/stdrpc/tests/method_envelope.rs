//! Envelope behaviour through the public codec trait.

use anyhow::Result;

use stdpack::EncodableValue;
use stdrpc::MethodCall;
use stdrpc::MethodCodec;
use stdrpc::MethodResult;
use stdrpc::StandardMethodCodec;

#[test]
fn call_with_every_argument_kind() -> Result<()> {
    let codec = StandardMethodCodec::new();
    let arguments = EncodableValue::list([
        EncodableValue::Null,
        EncodableValue::TRUE,
        EncodableValue::Int32(-7),
        EncodableValue::Int64(1 << 40),
        EncodableValue::Float64(0.25),
        EncodableValue::from("text"),
        EncodableValue::from(vec![0u8, 255]),
        EncodableValue::from(vec![i32::MIN]),
        EncodableValue::from(vec![i64::MAX]),
        EncodableValue::from(vec![0.5f32]),
        EncodableValue::from(vec![-0.5f64]),
        EncodableValue::map([(EncodableValue::list([1i32]), "list key")]),
    ]);
    let call = MethodCall::new("everything", arguments);
    let bytes = codec.encode_method_call(&call)?;
    assert_eq!(codec.decode_method_call(&bytes)?, call);
    Ok(())
}

#[test]
fn results_survive_the_codec() -> Result<()> {
    let codec = StandardMethodCodec::new();
    let results = [
        MethodResult::success(EncodableValue::Null),
        MethodResult::success(EncodableValue::map([("ok", true)])),
        MethodResult::error("E", None, None),
        MethodResult::error("E", Some("message".into()), Some(EncodableValue::from(3i64))),
    ];
    for result in results {
        let bytes = codec.encode_method_result(&result)?;
        assert_eq!(codec.decode_method_result(&bytes)?, result);
    }
    Ok(())
}

#[test]
fn null_details_decode_as_absent() -> Result<()> {
    let codec = StandardMethodCodec::new();
    let explicit_null = MethodResult::error("E", None, Some(EncodableValue::Null));
    let decoded = codec.decode_method_result(&codec.encode_method_result(&explicit_null)?)?;
    assert_eq!(decoded, MethodResult::error("E", None, None));
    Ok(())
}
