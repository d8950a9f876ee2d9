#![no_main]

use bytestruct::fuzz::structs::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzCase| { harness(data) });
