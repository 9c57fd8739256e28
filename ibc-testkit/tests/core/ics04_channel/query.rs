use ibc_eureka_core::channel::query::{
    next_sequence_send, packet_acknowledgement, packet_acknowledgements, packet_commitment,
    packet_commitments, packet_receipt, packet_receipts, unreceived_acks, unreceived_packets,
};
use ibc_eureka_core::channel::types::commitment::{compute_ack_commitment, compute_packet_commitment};
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::Packet;
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_testkit::fixtures::context::dummy_relayer_context;
use ibc_testkit::fixtures::packet::{dummy_transfer_payload, timeout_after};
use ibc_testkit::relayer::context::RelayerContext;
use rstest::*;
use test_log::test;

/// Sends three packets from A; B receives the first two and A processes
/// the acknowledgement of the first.
#[fixture]
fn relayer() -> (RelayerContext, Vec<Packet>) {
    let mut relayer = dummy_relayer_context(1_000);
    let timeout = timeout_after(relayer.get_ctx_a().latest_timestamp(), 600);

    let packets: Vec<Packet> = (0..3)
        .map(|_| {
            relayer
                .send_packet_on_a(dummy_transfer_payload(10), timeout)
                .expect("send succeeds")
        })
        .collect();

    for packet in &packets[..2] {
        relayer.recv_packet_on_b(packet.clone()).expect("recv succeeds");
    }

    let acknowledgement = relayer.acknowledgement_on_b(&packets[0]).unwrap();
    relayer
        .ack_packet_on_a(packets[0].clone(), acknowledgement)
        .expect("ack succeeds");

    (relayer, packets)
}

fn sequences(raw: &[u64]) -> Vec<Sequence> {
    raw.iter().copied().map(Sequence::from).collect()
}

#[rstest]
#[test]
fn source_chain_queries(relayer: (RelayerContext, Vec<Packet>)) {
    let (relayer, packets) = relayer;
    let ctx_a = relayer.get_ctx_a().ibc_store();
    let client_id = relayer.client_id_on_a();

    assert_eq!(next_sequence_send(ctx_a, client_id).unwrap(), Sequence::from(4));
    assert_eq!(
        next_sequence_send(ctx_a, relayer.client_id_on_b()).unwrap(),
        Sequence::from(1)
    );

    assert_eq!(
        packet_commitment(ctx_a, client_id, Sequence::from(2)).unwrap(),
        compute_packet_commitment(&packets[1])
    );
    assert!(matches!(
        packet_commitment(ctx_a, client_id, Sequence::from(1)),
        Err(ChannelError::PacketCommitmentNotFound { .. })
    ));

    let listed: Vec<Sequence> = packet_commitments(ctx_a, client_id)
        .unwrap()
        .into_iter()
        .map(|state| state.sequence)
        .collect();
    assert_eq!(listed, sequences(&[2, 3]));

    assert_eq!(
        unreceived_acks(ctx_a, client_id, &sequences(&[1, 2, 3])).unwrap(),
        sequences(&[2, 3])
    );
}

#[rstest]
#[test]
fn destination_chain_queries(relayer: (RelayerContext, Vec<Packet>)) {
    let (relayer, packets) = relayer;
    let ctx_b = relayer.get_ctx_b().ibc_store();
    let client_id = relayer.client_id_on_b();

    assert!(packet_receipt(ctx_b, client_id, Sequence::from(1)).unwrap());
    assert!(!packet_receipt(ctx_b, client_id, Sequence::from(3)).unwrap());

    let receipts: Vec<Sequence> = packet_receipts(ctx_b, client_id)
        .unwrap()
        .into_iter()
        .map(|state| state.sequence)
        .collect();
    assert_eq!(receipts, sequences(&[1, 2]));

    let acknowledgement = relayer.acknowledgement_on_b(&packets[0]).unwrap();
    assert_eq!(
        packet_acknowledgement(ctx_b, client_id, Sequence::from(1)).unwrap(),
        compute_ack_commitment(&acknowledgement)
    );
    assert_eq!(packet_acknowledgements(ctx_b, client_id).unwrap().len(), 2);

    assert_eq!(
        unreceived_packets(ctx_b, client_id, &sequences(&[1, 2, 3, 4])).unwrap(),
        sequences(&[3, 4])
    );
}
