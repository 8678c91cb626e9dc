#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding stored bytes must never panic on malformed input.
    let _ = bincode::deserialize::<oracle_store::EventRecord>(data);
    let _ = bincode::deserialize::<oracle_store::SubmissionRecord>(data);
    let _ = bincode::deserialize::<oracle_store::ProposalRecord>(data);
    let _ = bincode::deserialize::<oracle_store::DisputeRecord>(data);
    let _ = bincode::deserialize::<oracle_store::VoteRecord>(data);
    let _ = bincode::deserialize::<oracle_types::ResultHash>(data);
    let _ = bincode::deserialize::<oracle_types::Ciphertext>(data);

    // Snapshots as a whole.
    let _ = oracle_nullables::NullStore::load_state(data);
});
