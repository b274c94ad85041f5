//! Embedded ELF and image id of the work-proof guest
//! (`AGENT_WORK_IMAGE_ELF`, `AGENT_WORK_IMAGE_ID`).

include!(concat!(env!("OUT_DIR"), "/methods.rs"));
