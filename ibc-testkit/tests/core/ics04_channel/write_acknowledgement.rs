use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::Packet;
use ibc_eureka_core::handler::types::msgs::{MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_eureka_core::host::types::path::{AckPath, AsyncPacketPath};
use ibc_eureka_core::host::ValidationContext;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{dummy_transfer_payload, timeout_after};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::testapp::applications::transfer::RecvMode;
use rstest::*;
use test_log::test;

#[fixture]
fn relayer() -> RelayerContext {
    let mut relayer = dummy_relayer_context(1_000);
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Async;
    relayer
}

/// Relays a packet B acknowledges asynchronously.
fn pending_packet(relayer: &mut RelayerContext) -> Packet {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let packet = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .expect("send succeeds");
    let response = relayer
        .recv_packet_on_b(packet.clone())
        .expect("recv succeeds");
    assert_eq!(response, MsgResponse::Recv(ResponseResultType::Success));
    packet
}

#[rstest]
#[test]
fn async_recv_defers_the_acknowledgement(mut relayer: RelayerContext) {
    let packet = pending_packet(&mut relayer);

    let ibc_store = relayer.get_ctx_b().ibc_store();
    let client_id = &packet.destination_client;
    assert!(ibc_store
        .get_packet_acknowledgement(&AckPath::new(client_id, packet.sequence))
        .unwrap()
        .is_none());
    assert_eq!(
        ibc_store
            .get_async_packet(&AsyncPacketPath::new(client_id, packet.sequence))
            .unwrap(),
        Some(packet.clone())
    );
    assert!(relayer.acknowledgement_on_b(&packet).is_err());
}

#[rstest]
#[test]
fn written_acknowledgement_completes_the_lifecycle(mut relayer: RelayerContext) {
    let packet = pending_packet(&mut relayer);
    let acknowledgement = Acknowledgement::success(vec![b"done".to_vec()]);

    relayer
        .get_ctx_b_mut()
        .write_acknowledgement(
            &packet.destination_client,
            packet.sequence,
            acknowledgement.clone(),
        )
        .unwrap();

    let ibc_store = relayer.get_ctx_b().ibc_store();
    assert!(ibc_store
        .get_async_packet(&AsyncPacketPath::new(
            &packet.destination_client,
            packet.sequence
        ))
        .unwrap()
        .is_none());
    assert_eq!(relayer.acknowledgement_on_b(&packet).unwrap(), acknowledgement);

    let response = relayer.ack_packet_on_a(packet, acknowledgement).unwrap();
    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));
}

#[rstest]
#[test]
fn acknowledgement_is_written_once(mut relayer: RelayerContext) {
    let packet = pending_packet(&mut relayer);
    let client_id = packet.destination_client.clone();

    relayer
        .get_ctx_b_mut()
        .write_acknowledgement(&client_id, packet.sequence, Acknowledgement::failure())
        .unwrap();

    let err = relayer
        .get_ctx_b_mut()
        .write_acknowledgement(&client_id, packet.sequence, Acknowledgement::failure())
        .unwrap_err();
    assert!(matches!(err, ChannelError::AsyncPacketNotFound { .. }));
}

#[rstest]
#[test]
fn unknown_packet_cannot_be_acknowledged(mut relayer: RelayerContext) {
    let client_id = relayer.client_id_on_b().clone();

    let err = relayer
        .get_ctx_b_mut()
        .write_acknowledgement(
            &client_id,
            Sequence::from(42),
            Acknowledgement::success(vec![b"done".to_vec()]),
        )
        .unwrap_err();
    assert!(matches!(err, ChannelError::AsyncPacketNotFound { .. }));
}

#[rstest]
#[test]
fn written_acknowledgement_must_cover_every_payload(mut relayer: RelayerContext) {
    let packet = pending_packet(&mut relayer);

    let err = relayer
        .get_ctx_b_mut()
        .write_acknowledgement(
            &packet.destination_client,
            packet.sequence,
            Acknowledgement::success(vec![b"one".to_vec(), b"two".to_vec()]),
        )
        .unwrap_err();
    assert!(matches!(err, ChannelError::InvalidAcknowledgement { .. }));

    // the packet is still pending
    assert!(relayer
        .get_ctx_b()
        .ibc_store()
        .get_async_packet(&AsyncPacketPath::new(
            &packet.destination_client,
            packet.sequence
        ))
        .unwrap()
        .is_some());
}
