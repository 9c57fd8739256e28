use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::Packet;
use ibc_eureka_core::handler::types::error::HandlerError;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::handler::types::msgs::{MsgResponse, ResponseResultType};
use ibc_eureka_core::host::types::path::CommitmentPath;
use ibc_eureka_core::host::ValidationContext;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{dummy_transfer_payload, timeout_after, SENDER};
use ibc_testkit::relayer::context::RelayerContext;
use ibc_testkit::relayer::error::RelayerError;
use ibc_testkit::testapp::applications::transfer::{
    balance_of, escrow_account, RecvMode, SUCCESS_ACK,
};
use rstest::*;
use test_log::test;

#[fixture]
fn relayer() -> RelayerContext {
    dummy_relayer_context(1_000)
}

/// Sends a packet from A and has B receive it.
fn received_packet(relayer: &mut RelayerContext) -> (Packet, Acknowledgement) {
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);
    let packet = relayer
        .send_packet_on_a(dummy_transfer_payload(100), timeout)
        .expect("send succeeds");
    relayer
        .recv_packet_on_b(packet.clone())
        .expect("recv succeeds");
    let acknowledgement = relayer
        .acknowledgement_on_b(&packet)
        .expect("acknowledgement written");
    (packet, acknowledgement)
}

fn has_commitment(relayer: &RelayerContext, packet: &Packet) -> bool {
    relayer
        .get_ctx_a()
        .ibc_store()
        .get_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))
        .unwrap()
        .is_some()
}

#[rstest]
#[test]
fn acknowledgement_deletes_commitment(mut relayer: RelayerContext) {
    let (packet, acknowledgement) = received_packet(&mut relayer);
    assert!(has_commitment(&relayer, &packet));

    let response = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .unwrap();
    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));
    assert!(!has_commitment(&relayer, &packet));

    let ctx_a = relayer.get_ctx_a();
    assert!(ctx_a
        .get_events()
        .iter()
        .any(|event| matches!(event, IbcEvent::AcknowledgePacket(e) if e.packet() == &packet)));

    // a successful receive keeps the tokens escrowed
    let store = &ctx_a.ibc_store().app.store;
    assert_eq!(balance_of(store, SENDER).unwrap(), 900);
    assert_eq!(
        balance_of(store, &escrow_account(&packet.source_client)).unwrap(),
        100
    );
}

#[rstest]
#[test]
fn replayed_acknowledgement_is_a_noop(mut relayer: RelayerContext) {
    let (packet, acknowledgement) = received_packet(&mut relayer);
    relayer
        .ack_packet_on_a(packet.clone(), acknowledgement.clone())
        .unwrap();
    let events_before = relayer.get_ctx_a().get_events().len();

    let response = relayer
        .ack_packet_on_a(packet, acknowledgement)
        .unwrap();
    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Noop));
    assert_eq!(relayer.get_ctx_a().get_events().len(), events_before);
}

#[rstest]
#[test]
fn error_acknowledgement_refunds_sender(mut relayer: RelayerContext) {
    relayer
        .get_ctx_b_mut()
        .ibc_router
        .transfer_mut()
        .app_mut()
        .recv_mode = RecvMode::Fail;

    let (packet, acknowledgement) = received_packet(&mut relayer);
    assert_eq!(acknowledgement, Acknowledgement::failure());

    let response = relayer
        .ack_packet_on_a(packet.clone(), acknowledgement)
        .unwrap();
    assert_eq!(response, MsgResponse::Ack(ResponseResultType::Success));

    let store = &relayer.get_ctx_a().ibc_store().app.store;
    assert_eq!(balance_of(store, SENDER).unwrap(), 1_000);
    assert_eq!(
        balance_of(store, &escrow_account(&packet.source_client)).unwrap(),
        0
    );
}

#[rstest]
#[test]
fn acknowledgement_must_match_the_written_one(mut relayer: RelayerContext) {
    let (packet, _) = received_packet(&mut relayer);

    let forged = Acknowledgement::success(vec![b"forged".to_vec()]);
    let err = relayer
        .ack_packet_on_a(packet.clone(), forged)
        .unwrap_err();

    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(
            ChannelError::FailedProofVerification { .. }
        ))
    ));
    assert!(has_commitment(&relayer, &packet));
}

#[rstest]
#[test]
fn acknowledgement_needs_one_app_acknowledgement_per_payload(mut relayer: RelayerContext) {
    let (packet, _) = received_packet(&mut relayer);

    let acknowledgement =
        Acknowledgement::success(vec![SUCCESS_ACK.to_vec(), SUCCESS_ACK.to_vec()]);
    let err = relayer
        .ack_packet_on_a(packet, acknowledgement)
        .unwrap_err();

    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(
            ChannelError::InvalidAcknowledgement { .. }
        ))
    ));
}

#[rstest]
#[test]
fn acknowledgement_of_a_different_packet_is_rejected(mut relayer: RelayerContext) {
    let (mut packet, acknowledgement) = received_packet(&mut relayer);
    packet.payloads = vec![dummy_transfer_payload(1)];

    let err = relayer
        .ack_packet_on_a(packet, acknowledgement)
        .unwrap_err();

    assert!(matches!(
        err,
        RelayerError::TransactionFailed(HandlerError::Channel(ChannelError::InvalidPacket { .. }))
    ));
}
