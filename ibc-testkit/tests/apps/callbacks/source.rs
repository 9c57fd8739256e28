use core::time::Duration;

use ibc_app_callbacks::types::events::{
    CALLBACK_ADDRESS_ATTRIBUTE_KEY, CALLBACK_ERROR_ATTRIBUTE_KEY,
    CALLBACK_RESULT_ATTRIBUTE_KEY, CALLBACK_RESULT_FAILURE, CALLBACK_RESULT_SUCCESS,
    CALLBACK_SEQUENCE_ATTRIBUTE_KEY, CALLBACK_SOURCE_CLIENT_ATTRIBUTE_KEY,
    CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY, SOURCE_CALLBACK_EVENT,
};
use ibc_app_callbacks::types::CallbackType;
use ibc_eureka_core::channel::types::acknowledgement::error_acknowledgement;
use ibc_eureka_core::channel::types::packet::{Packet, Payload};
use ibc_eureka_core::handler::types::error::HandlerError;
use ibc_eureka_core::handler::types::msgs::{MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_eureka_core::host::types::path::CommitmentPath;
use ibc_eureka_core::host::ValidationContext;
use ibc_eureka_core::router::types::error::AbortSignal;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{
    callback_payload, dummy_signer, dummy_transfer_data, timeout_after, CallbackMemo, CONTRACT,
    SENDER,
};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::applications::contract::ContractBehavior;
use ibc_testkit::testapp::applications::transfer::{balance_of, RecvMode, SUCCESS_ACK};
use ibc_testkit::testapp::router::DEFAULT_MAX_CALLBACK_GAS;
use rstest::*;
use test_log::test;

use super::{abort_signal, callback_event, contract_state_committed, keeper, script};

const TIMEOUT_SECS: u64 = 60;

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

fn source_callback_payload(amount: u64) -> Payload {
    callback_payload(amount, Some(CallbackMemo::new(CONTRACT)), None)
}

fn send(relayer: &mut RelayerContext, payload: Payload) -> Result<Packet, RelayerError> {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), TIMEOUT_SECS);
    relayer.send_packet_on_a(payload, timeout)
}

fn sender_balance(relayer: &RelayerContext) -> u64 {
    balance_of(&relayer.get_ctx_a().ibc_store().app.store, SENDER).unwrap()
}

#[rstest]
#[test]
fn send_callback_runs_after_the_application(mut relayer: RelayerContext) {
    let payload = callback_payload(
        100,
        Some(CallbackMemo::new(CONTRACT).with_calldata(&[0xbe, 0xef])),
        None,
    );
    let packet = send(&mut relayer, payload).expect("send succeeds");

    let ctx_a = relayer.get_ctx_a();
    let calls = keeper(ctx_a).calls_of(CallbackType::SendPacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].contract, CONTRACT);
    assert_eq!(calls[0].sequence, packet.sequence);
    assert_eq!(calls[0].calldata, vec![0xbe, 0xef]);
    assert_eq!(calls[0].execution_gas_limit, DEFAULT_MAX_CALLBACK_GAS);
    assert!(contract_state_committed(ctx_a, CallbackType::SendPacket, packet.sequence));
    assert_eq!(sender_balance(&relayer), 900);

    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::SendPacket)
        .expect("send callback event");
    assert_eq!(event.attribute(CALLBACK_ADDRESS_ATTRIBUTE_KEY), Some(CONTRACT));
    assert_eq!(event.attribute(CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY), Some("transfer"));
    assert_eq!(
        event.attribute(CALLBACK_SOURCE_CLIENT_ATTRIBUTE_KEY),
        Some(relayer.client_id_on_a().as_str())
    );
    assert_eq!(event.attribute(CALLBACK_SEQUENCE_ATTRIBUTE_KEY), Some("1"));
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_SUCCESS)
    );
}

#[rstest]
#[test]
fn failing_send_callback_rejects_the_send(mut relayer: RelayerContext) {
    script(relayer.get_ctx_a_mut(), CallbackType::SendPacket, ContractBehavior::Fail);

    let err = send(&mut relayer, source_callback_payload(100)).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(_))
    ));
    assert!(abort_signal(&err).is_none());

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(keeper(ctx_a).calls_of(CallbackType::SendPacket).len(), 1);
    assert!(!contract_state_committed(ctx_a, CallbackType::SendPacket, Sequence::from(1)));
    assert!(ctx_a
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(relayer.client_id_on_a(), Sequence::from(1)))
        .unwrap()
        .is_none());
    assert!(ctx_a.module_events(SOURCE_CALLBACK_EVENT).is_empty());
    assert_eq!(sender_balance(&relayer), 1_000);
}

#[rstest]
#[test]
fn panicking_send_callback_aborts_the_transaction(mut relayer: RelayerContext) {
    script(relayer.get_ctx_a_mut(), CallbackType::SendPacket, ContractBehavior::Panic);

    let err = send(&mut relayer, source_callback_payload(100)).unwrap_err();

    assert!(matches!(abort_signal(&err), Some(AbortSignal::Panic { .. })));
    assert_eq!(sender_balance(&relayer), 1_000);
}

#[rstest]
#[case::blank_address(CallbackMemo::new("  "))]
#[case::unparsable_gas_limit(CallbackMemo {
    gas_limit: Some("plenty".to_string()),
    ..CallbackMemo::new(CONTRACT)
})]
#[test_log::test]
fn malformed_source_callback_is_skipped(mut relayer: RelayerContext, #[case] memo: CallbackMemo) {
    let packet = send(&mut relayer, callback_payload(100, Some(memo), None)).expect("send succeeds");

    let ctx_a = relayer.get_ctx_a();
    assert!(keeper(ctx_a).calls().is_empty());
    assert!(ctx_a
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(relayer.client_id_on_a(), packet.sequence))
        .unwrap()
        .is_some());
    assert!(ctx_a.module_events(SOURCE_CALLBACK_EVENT).is_empty());
    assert_eq!(sender_balance(&relayer), 900);

    // the acknowledgement callback is skipped the same way
    relayer.recv_packet_on_b(packet.clone()).expect("recv succeeds");
    let acknowledgement = relayer.acknowledgement_on_b(&packet).unwrap();
    let response = relayer
        .ack_packet_on_a(packet, acknowledgement)
        .expect("ack succeeds");

    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));
    assert!(keeper(relayer.get_ctx_a()).calls().is_empty());
}

#[rstest]
#[test]
fn acknowledgement_callback_sees_the_app_acknowledgement(mut relayer: RelayerContext) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), TIMEOUT_SECS);
    let (packet, _) = relayer
        .relay_packet(source_callback_payload(100), timeout)
        .expect("relay succeeds");

    let ctx_a = relayer.get_ctx_a();
    let calls = keeper(ctx_a).calls_of(CallbackType::AcknowledgementPacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].acknowledgement.as_deref(), Some(SUCCESS_ACK));
    assert_eq!(calls[0].relayer, Some(dummy_signer()));
    assert!(contract_state_committed(
        ctx_a,
        CallbackType::AcknowledgementPacket,
        packet.sequence
    ));

    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::AcknowledgementPacket)
        .expect("acknowledgement callback event");
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_SUCCESS)
    );
}

#[rstest]
#[test]
fn failing_acknowledgement_callback_does_not_block_the_packet(mut relayer: RelayerContext) {
    script(
        relayer.get_ctx_a_mut(),
        CallbackType::AcknowledgementPacket,
        ContractBehavior::Fail,
    );

    let packet = send(&mut relayer, source_callback_payload(100)).expect("send succeeds");
    relayer.recv_packet_on_b(packet.clone()).expect("recv succeeds");
    let acknowledgement = relayer.acknowledgement_on_b(&packet).unwrap();
    let response = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .expect("ack succeeds");

    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));

    let ctx_a = relayer.get_ctx_a();
    assert!(ctx_a
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))
        .unwrap()
        .is_none());
    assert!(!contract_state_committed(
        ctx_a,
        CallbackType::AcknowledgementPacket,
        packet.sequence
    ));

    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::AcknowledgementPacket)
        .expect("acknowledgement callback event");
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_FAILURE)
    );
    assert!(event.attribute(CALLBACK_ERROR_ATTRIBUTE_KEY).is_some());
}

#[rstest]
#[test]
fn acknowledgement_callback_sees_the_error_acknowledgement(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Fail;

    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), TIMEOUT_SECS);
    relayer
        .relay_packet(source_callback_payload(100), timeout)
        .expect("relay succeeds");

    let calls = keeper(relayer.get_ctx_a()).calls_of(CallbackType::AcknowledgementPacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].acknowledgement.as_deref(),
        Some(error_acknowledgement().as_slice())
    );
    assert_eq!(sender_balance(&relayer), 1_000);
}

#[rstest]
#[case::succeeding_contract(ContractBehavior::Succeed, true)]
#[case::failing_contract(ContractBehavior::Fail, false)]
#[case::panicking_contract(ContractBehavior::Panic, false)]
#[test_log::test]
fn timeout_callback_never_blocks_the_refund(
    mut relayer: RelayerContext,
    #[case] behavior: ContractBehavior,
    #[case] committed: bool,
) {
    script(relayer.get_ctx_a_mut(), CallbackType::TimeoutPacket, behavior);

    let packet = send(&mut relayer, source_callback_payload(100)).expect("send succeeds");
    relayer
        .get_ctx_b_mut()
        .advance_time(Duration::from_secs(2 * TIMEOUT_SECS));

    let response = relayer.timeout_packet_on_a(packet.clone()).unwrap();
    assert_eq!(response, MsgResponse::Timeout(ResponseResultType::Success));
    assert_eq!(sender_balance(&relayer), 1_000);

    let ctx_a = relayer.get_ctx_a();
    let calls = keeper(ctx_a).calls_of(CallbackType::TimeoutPacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].relayer, Some(dummy_signer()));
    assert_eq!(
        contract_state_committed(ctx_a, CallbackType::TimeoutPacket, packet.sequence),
        committed
    );

    let expected = if committed {
        CALLBACK_RESULT_SUCCESS
    } else {
        CALLBACK_RESULT_FAILURE
    };
    let event = callback_event(ctx_a, SOURCE_CALLBACK_EVENT, CallbackType::TimeoutPacket)
        .expect("timeout callback event");
    assert_eq!(event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY), Some(expected));
}

#[rstest]
#[case::plain_text("thanks for the tokens")]
#[case::unrelated_json(r#"{"forward":{"receiver":"cosmos1other"}}"#)]
#[case::non_object_callback(r#"{"src_callback":"cosmos1contract"}"#)]
#[test_log::test]
fn memo_without_callbacks_runs_no_contract(mut relayer: RelayerContext, #[case] memo: &str) {
    let payload = dummy_transfer_data(100).with_memo(memo).into_payload();
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), TIMEOUT_SECS);

    relayer.relay_packet(payload, timeout).expect("relay succeeds");

    assert!(keeper(relayer.get_ctx_a()).calls().is_empty());
    assert!(keeper(relayer.get_ctx_b()).calls().is_empty());
    assert!(relayer.get_ctx_a().module_events(SOURCE_CALLBACK_EVENT).is_empty());
}
