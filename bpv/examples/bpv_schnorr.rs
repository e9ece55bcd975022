use bpv::{BpvParams, BpvTable, Signature, TableStore, VerifyingKey, bpv_schnorr_sign};
use bpv::{Keypair, bpv_schnorr_verify};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let params = BpvParams::new(512, 16).expect("params");
    let store = TableStore::new(BpvTable::generate(params, &mut rng).expect("table"));

    let keypair = {
        let table = store.current();
        Keypair::generate_with_table(&table, &mut rng).expect("keypair")
    };
    let vk_bytes = bincode::serialize(keypair.verifying_key()).expect("serialize vk");

    let msg = b"hello bpv";
    let (epoch, table) = store.snapshot();
    let sig = bpv_schnorr_sign(&table, &keypair, msg, &mut rng).expect("sign");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");
    info!(epoch, sig_len = sig_bytes.len(), "signed message");

    // Re-keying: signatures made from the old table stay valid.
    let epoch = store.publish(BpvTable::generate(params, &mut rng).expect("table"));
    info!(epoch, "published fresh table");

    let vk: VerifyingKey = bincode::deserialize(&vk_bytes).expect("deserialize vk");
    let sig2: Signature = bincode::deserialize(&sig_bytes).expect("deserialize sig");
    assert!(vk.verify(msg, &sig2).expect("verify"));

    let ok = bpv_schnorr_verify(&vk.to_bytes(), msg, &sig2.to_bytes()).expect("verify");
    assert!(ok);
    info!("signature verified");
}
