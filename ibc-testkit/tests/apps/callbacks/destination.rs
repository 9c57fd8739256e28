use ibc_app_callbacks::types::events::{
    CALLBACK_DEST_CLIENT_ATTRIBUTE_KEY, CALLBACK_DEST_PORT_ATTRIBUTE_KEY,
    CALLBACK_RESULT_ATTRIBUTE_KEY, CALLBACK_RESULT_FAILURE, CALLBACK_RESULT_SUCCESS,
    CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY, DESTINATION_CALLBACK_EVENT,
};
use ibc_app_callbacks::types::CallbackType;
use ibc_eureka_core::channel::handler::ERROR_EVENT_PREFIX;
use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::{Packet, Payload};
use ibc_eureka_core::handler::types::msgs::{MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::path::AsyncPacketPath;
use ibc_eureka_core::host::{ExecutionContext, ValidationContext};
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{
    callback_payload, timeout_after, CallbackMemo, CONTRACT, RECEIVER, SENDER,
};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::applications::contract::ContractBehavior;
use ibc_testkit::testapp::applications::transfer::{balance_of, RecvMode, SUCCESS_ACK};
use rstest::*;
use test_log::test;

use super::{callback_event, contract_state_committed, keeper, script};

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

fn destination_callback_payload(memo: CallbackMemo) -> Payload {
    callback_payload(100, None, Some(memo))
}

/// Sends `payload` from A and has B receive it.
fn deliver_to_b(relayer: &mut RelayerContext, payload: Payload) -> (Packet, MsgResponse) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let packet = relayer
        .send_packet_on_a(payload, timeout)
        .expect("send succeeds");
    let response = relayer
        .recv_packet_on_b(packet.clone())
        .expect("recv succeeds");
    (packet, response)
}

fn receiver_balance(relayer: &RelayerContext) -> u64 {
    balance_of(&relayer.get_ctx_b().ibc_store().app.store, RECEIVER).unwrap()
}

#[rstest]
#[test]
fn receive_callback_sees_the_app_acknowledgement(mut relayer: RelayerContext) {
    let (packet, response) =
        deliver_to_b(&mut relayer, destination_callback_payload(CallbackMemo::new(CONTRACT)));

    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Success));
    assert_eq!(receiver_balance(&relayer), 100);

    let ctx_b = relayer.get_ctx_b();
    let calls = keeper(ctx_b).calls_of(CallbackType::ReceivePacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].acknowledgement.as_deref(), Some(SUCCESS_ACK));
    assert!(contract_state_committed(
        ctx_b,
        CallbackType::ReceivePacket,
        packet.sequence
    ));

    let event = callback_event(ctx_b, DESTINATION_CALLBACK_EVENT, CallbackType::ReceivePacket)
        .expect("receive callback event");
    assert_eq!(event.attribute(CALLBACK_DEST_PORT_ATTRIBUTE_KEY), Some("transfer"));
    assert_eq!(
        event.attribute(CALLBACK_DEST_CLIENT_ATTRIBUTE_KEY),
        Some(relayer.client_id_on_b().as_str())
    );
    assert_eq!(event.attribute(CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY), None);
    assert_eq!(
        event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_SUCCESS)
    );

    // source callbacks were not requested
    assert!(keeper(relayer.get_ctx_a()).calls().is_empty());
}

#[rstest]
#[case::failing_contract(ContractBehavior::Fail)]
#[case::panicking_contract(ContractBehavior::Panic)]
#[test_log::test]
fn failing_receive_callback_fails_the_receive(
    mut relayer: RelayerContext,
    #[case] behavior: ContractBehavior,
) {
    script(relayer.get_ctx_b_mut(), CallbackType::ReceivePacket, behavior);

    let (packet, response) =
        deliver_to_b(&mut relayer, destination_callback_payload(CallbackMemo::new(CONTRACT)));

    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Failure));
    assert_eq!(receiver_balance(&relayer), 0);

    let ctx_b = relayer.get_ctx_b();
    assert_eq!(keeper(ctx_b).calls_of(CallbackType::ReceivePacket).len(), 1);
    assert!(!contract_state_committed(
        ctx_b,
        CallbackType::ReceivePacket,
        packet.sequence
    ));
    assert!(ctx_b.module_events(DESTINATION_CALLBACK_EVENT).is_empty());

    let failed = ctx_b.module_events(&format!("{ERROR_EVENT_PREFIX}{DESTINATION_CALLBACK_EVENT}"));
    assert_eq!(failed.len(), 1);
    assert_eq!(
        failed[0].attribute(CALLBACK_RESULT_ATTRIBUTE_KEY),
        Some(CALLBACK_RESULT_FAILURE)
    );

    let acknowledgement = relayer.acknowledgement_on_b(&packet).unwrap();
    assert_eq!(acknowledgement, Acknowledgement::failure());

    relayer
        .ack_packet_on_a(packet, acknowledgement)
        .expect("ack succeeds");
    assert_eq!(
        balance_of(&relayer.get_ctx_a().ibc_store().app.store, SENDER).unwrap(),
        1_000
    );
}

#[rstest]
#[case::negative_gas_limit(CallbackMemo {
    gas_limit: Some("-1".to_string()),
    ..CallbackMemo::new(CONTRACT)
})]
#[case::blank_address(CallbackMemo::new(""))]
#[test_log::test]
fn malformed_destination_callback_is_skipped(
    mut relayer: RelayerContext,
    #[case] memo: CallbackMemo,
) {
    let (packet, response) = deliver_to_b(&mut relayer, destination_callback_payload(memo));

    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Success));
    assert_eq!(receiver_balance(&relayer), 100);

    let ctx_b = relayer.get_ctx_b();
    assert!(keeper(ctx_b).calls().is_empty());
    assert!(ctx_b.module_events(DESTINATION_CALLBACK_EVENT).is_empty());
    assert_eq!(
        relayer.acknowledgement_on_b(&packet).unwrap(),
        Acknowledgement::success(vec![SUCCESS_ACK.to_vec()])
    );
}

#[rstest]
#[test]
fn failed_application_skips_the_receive_callback(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Fail;

    let (_, response) =
        deliver_to_b(&mut relayer, destination_callback_payload(CallbackMemo::new(CONTRACT)));

    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Failure));
    assert!(keeper(relayer.get_ctx_b()).calls().is_empty());
}

#[rstest]
#[case::succeeding_contract(ContractBehavior::Succeed, CALLBACK_RESULT_SUCCESS)]
#[case::failing_contract(ContractBehavior::Fail, CALLBACK_RESULT_FAILURE)]
#[test_log::test]
fn async_receive_calls_back_once_acknowledged(
    mut relayer: RelayerContext,
    #[case] behavior: ContractBehavior,
    #[case] result: &str,
) {
    let ctx_b = relayer.get_ctx_b_mut();
    ctx_b.ibc_router.transfer_mut().app_mut().recv_mode = RecvMode::Async;
    script(ctx_b, CallbackType::ReceivePacket, behavior);

    let (packet, response) =
        deliver_to_b(&mut relayer, destination_callback_payload(CallbackMemo::new(CONTRACT)));
    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Success));
    assert!(keeper(relayer.get_ctx_b()).calls().is_empty());

    let client_id = relayer.client_id_on_b().clone();
    let acknowledgement = Acknowledgement::success(vec![b"async-result".to_vec()]);
    relayer
        .get_ctx_b_mut()
        .write_acknowledgement(&client_id, packet.sequence, acknowledgement.clone())
        .expect("acknowledgement is written");

    let ctx_b = relayer.get_ctx_b();
    let calls = keeper(ctx_b).calls_of(CallbackType::ReceivePacket);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].acknowledgement.as_deref(), Some(b"async-result".as_slice()));
    assert!(ctx_b
        .ibc_store()
        .get_async_packet(&AsyncPacketPath::new(&client_id, packet.sequence))
        .unwrap()
        .is_none());

    let event = callback_event(ctx_b, DESTINATION_CALLBACK_EVENT, CallbackType::ReceivePacket)
        .expect("receive callback event");
    assert_eq!(event.attribute(CALLBACK_RESULT_ATTRIBUTE_KEY), Some(result));

    // the written acknowledgement stands whatever the contract did
    assert_eq!(relayer.acknowledgement_on_b(&packet).unwrap(), acknowledgement);
}

#[rstest]
#[test]
fn async_acknowledgement_of_an_undecodable_payload_is_rejected(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Async;

    let (mut packet, _) =
        deliver_to_b(&mut relayer, destination_callback_payload(CallbackMemo::new(CONTRACT)));

    let client_id = relayer.client_id_on_b().clone();
    let path = AsyncPacketPath::new(&client_id, packet.sequence);
    packet.payloads[0].value = b"not json".to_vec();
    relayer
        .get_ctx_b_mut()
        .ibc_store_mut()
        .store_async_packet(&path, packet.clone())
        .unwrap();

    let acknowledgement = Acknowledgement::success(vec![b"async-result".to_vec()]);
    let err = relayer
        .get_ctx_b_mut()
        .write_acknowledgement(&client_id, packet.sequence, acknowledgement)
        .unwrap_err();

    assert!(matches!(err, ChannelError::Module(_)));

    let ctx_b = relayer.get_ctx_b();
    assert!(keeper(ctx_b).calls().is_empty());
    assert!(ctx_b.ibc_store().get_async_packet(&path).unwrap().is_some());
    assert!(relayer.acknowledgement_on_b(&packet).is_err());
}
