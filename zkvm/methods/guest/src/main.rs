#![no_main]
#![forbid(unsafe_code)]

use agent_work_guest::{
    prove_work, verify_chain, AggregateCompute, FieldElement, ProofJournal, WorkRecord,
    WorkWitness, FIELD_ELEMENT_LEN, IMAGE_ID_LEN,
};
use risc0_zkvm::guest::env;

risc0_zkvm::entry!(main);

const MODE_PROVE_WORK: u8 = 0;
const MODE_VERIFY_CHAIN: u8 = 1;

fn read_field(name: &str) -> FieldElement {
    let bytes: [u8; FIELD_ELEMENT_LEN] = env::read();
    FieldElement::from_bytes(bytes)
        .unwrap_or_else(|err| panic!("{name} is not a field element: {err}"))
}

fn read_record() -> WorkRecord {
    let task_id = read_field("task_id");
    let result_hash = read_field("result_hash");
    let compute_units: u64 = env::read();
    let timestamp: u64 = env::read();
    WorkRecord::new(task_id, result_hash, compute_units, timestamp)
}

fn main() {
    let mode: u8 = env::read();
    let record = read_record();

    let journal = match mode {
        MODE_PROVE_WORK => {
            let witness = WorkWitness {
                model_commitment: read_field("model_commitment"),
                input_commitment: read_field("input_commitment"),
                output_value: read_field("output_value"),
            };
            prove_work(&record, &witness).unwrap_or_else(|err| panic!("{err}"))
        }
        MODE_VERIFY_CHAIN => {
            let inner_bytes: Vec<u8> = env::read();
            let chain_image_id: [u8; IMAGE_ID_LEN] = env::read();

            // Resolved as an assumption at the recursion layer.
            env::verify(chain_image_id, inner_bytes.as_slice())
                .expect("inner proof verification failed");

            let inner = ProofJournal::from_bytes(&inner_bytes)
                .unwrap_or_else(|err| panic!("{err}"));
            verify_chain(&AggregateCompute, &inner, &record, chain_image_id)
                .unwrap_or_else(|err| panic!("{err}"))
        }
        other => panic!("unsupported mode {other}"),
    };

    env::commit_slice(&journal.to_bytes());
}
