use core::time::Duration;

use ibc_eureka_core::channel::handler::ERROR_EVENT_PREFIX;
use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::commitment::compute_ack_commitment;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::msgs::{MsgRecvPacket, PacketMsg};
use ibc_eureka_core::channel::types::packet::Packet;
use ibc_eureka_core::client::types::Height;
use ibc_eureka_core::handler::types::error::HandlerError;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::handler::types::msgs::{MsgEnvelope, MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::path::{AckPath, ReceiptPath};
use ibc_eureka_core::host::ValidationContext;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{
    dummy_client_id, dummy_signer, dummy_transfer_payload, timeout_after, RECEIVER,
};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::applications::transfer::{
    balance_of, RecvMode, SUCCESS_ACK, TRANSFER_EVENT,
};
use ibc_testkit::testapp::clients::mock::mock_proof;
use rstest::*;
use test_log::test;

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

fn sent_packet(relayer: &mut RelayerContext) -> Packet {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .expect("send succeeds")
}

fn received_count(relayer: &RelayerContext) -> usize {
    relayer
        .get_ctx_b()
        .get_events()
        .iter()
        .filter(|event| matches!(event, IbcEvent::ReceivePacket(_)))
        .count()
}

#[rstest]
#[test]
fn recv_packet_stores_receipt_and_acknowledgement(mut relayer: RelayerContext) {
    let packet = sent_packet(&mut relayer);

    let response = relayer.recv_packet_on_b(packet.clone()).unwrap();
    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Success));

    let ibc_store = relayer.get_ctx_b().ibc_store();
    let client_id = &packet.destination_client;
    assert!(ibc_store
        .get_packet_receipt(&ReceiptPath::new(client_id, packet.sequence))
        .unwrap()
        .is_some());

    let expected = Acknowledgement::success(vec![SUCCESS_ACK.to_vec()]);
    assert_eq!(
        ibc_store
            .get_packet_acknowledgement(&AckPath::new(client_id, packet.sequence))
            .unwrap(),
        Some(compute_ack_commitment(&expected))
    );
    assert_eq!(relayer.acknowledgement_on_b(&packet).unwrap(), expected);
    assert_eq!(balance_of(&ibc_store.app.store, RECEIVER).unwrap(), 100);
}

#[rstest]
#[test]
fn replayed_recv_is_a_noop(mut relayer: RelayerContext) {
    let packet = sent_packet(&mut relayer);
    relayer.recv_packet_on_b(packet.clone()).unwrap();
    let ack_before = relayer
        .get_ctx_b()
        .ibc_store()
        .get_packet_acknowledgement(&AckPath::new(&packet.destination_client, packet.sequence))
        .unwrap();

    let response = relayer.recv_packet_on_b(packet.clone()).unwrap();
    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Noop));

    let ctx_b = relayer.get_ctx_b();
    assert_eq!(
        ctx_b
            .ibc_store()
            .get_packet_acknowledgement(&AckPath::new(&packet.destination_client, packet.sequence))
            .unwrap(),
        ack_before
    );
    // the application only ran once
    assert_eq!(balance_of(&ctx_b.ibc_store().app.store, RECEIVER).unwrap(), 100);
    assert_eq!(received_count(&relayer), 2);
    assert!(relayer
        .get_ctx_b()
        .get_logs()
        .iter()
        .any(|log| log.starts_with("no-op")));
}

#[rstest]
#[test]
fn recv_packet_rejects_elapsed_timeout(mut relayer: RelayerContext) {
    let packet = sent_packet(&mut relayer);
    relayer.get_ctx_b_mut().advance_time(Duration::from_secs(3_600));

    let err = relayer.recv_packet_on_b(packet.clone()).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::TimeoutElapsed { .. }))
    ));
    assert!(relayer
        .get_ctx_b()
        .ibc_store()
        .get_packet_receipt(&ReceiptPath::new(&packet.destination_client, packet.sequence))
        .unwrap()
        .is_none());
}

#[rstest]
#[test]
fn recv_packet_rejects_tampered_packet(mut relayer: RelayerContext) {
    let mut packet = sent_packet(&mut relayer);
    packet.payloads = vec![dummy_transfer_payload(999)];

    let err = relayer.recv_packet_on_b(packet).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(
            ChannelError::FailedProofVerification { .. }
        ))
    ));
    assert_eq!(received_count(&relayer), 0);
}

#[rstest]
#[test]
fn recv_packet_rejects_proof_at_unknown_height(mut relayer: RelayerContext) {
    let packet = sent_packet(&mut relayer);
    relayer.update_client_on_b();

    let unknown_height = Height::new(0, 1_000).unwrap();
    let msg = MsgEnvelope::from(PacketMsg::from(MsgRecvPacket::new(
        packet,
        mock_proof(&unknown_height),
        unknown_height,
        dummy_signer(),
    )));

    let err = relayer.get_ctx_b_mut().deliver(msg).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(
            ChannelError::FailedProofVerification { .. }
        ))
    ));
}

#[rstest]
#[test]
fn recv_packet_requires_matching_counterparty(mut relayer: RelayerContext) {
    let mut packet = sent_packet(&mut relayer);
    packet.source_client = dummy_client_id(7);

    let err = relayer.recv_packet_on_b(packet).unwrap_err();
    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(
            ChannelError::InvalidChannelIdentifier { .. }
        ))
    ));
}

#[rstest]
#[test]
fn failed_application_recv_writes_error_acknowledgement(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Fail;
    let packet = sent_packet(&mut relayer);

    let response = relayer.recv_packet_on_b(packet.clone()).unwrap();
    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Failure));

    let ctx_b = relayer.get_ctx_b();
    assert!(ctx_b
        .ibc_store()
        .get_packet_receipt(&ReceiptPath::new(&packet.destination_client, packet.sequence))
        .unwrap()
        .is_some());
    assert_eq!(
        relayer.acknowledgement_on_b(&packet).unwrap(),
        Acknowledgement::failure()
    );

    // the credit was discarded with the rest of the application's writes
    assert_eq!(balance_of(&ctx_b.ibc_store().app.store, RECEIVER).unwrap(), 0);
    assert!(ctx_b.module_events(TRANSFER_EVENT).is_empty());
    assert_eq!(
        ctx_b
            .module_events(&format!("{ERROR_EVENT_PREFIX}{TRANSFER_EVENT}"))
            .len(),
        1
    );
}
