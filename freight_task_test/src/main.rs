extern crate env_logger;
extern crate freight_core;
#[macro_use]
extern crate freight_task;
extern crate tempdir;

use std::fs;

use freight_core::FileStore;
use freight_task::{LocalClient, Task, STDOUT, WILDCARD};
use tempdir::TempDir;

fn main() {
    env_logger::init();

    let scratch = TempDir::new("freight-demo").expect("error creating scratch dir");
    let stage = TempDir::new("freight-demo-stage").expect("error creating stage dir");

    let file1 = scratch.path().join("file1.txt");
    fs::write(&file1, "content\n").expect("error writing file1");
    let file2 = scratch.path().join("file2.txt");
    fs::write(&file2, "more content\n").expect("error writing file2");

    let store = FileStore::with_stage_point(stage.path()).expect("error creating store");
    let client = LocalClient::new(store.clone());

    // Join an arbitrary number of input files into one output file.
    let mut joiner = Task::command("cat * > output");
    joiner.set_inputs(&[WILDCARD]).expect("error setting inputs");
    joiner.set_outputs(&["output"]).expect("error setting outputs");

    let input1 = store.load(&file1).expect("error loading file1");
    let input2 = store.load(&file2).expect("error loading file2");
    let deferred = client.submit(&joiner, task_args![input1, input2]);
    let joined = deferred
        .result()
        .expect("join task failed")
        .remove(0)
        .into_file()
        .expect("expected a file output");
    print!("joined: {}", joined.read_text().expect("error reading output"));

    // Word-count the joined file, capturing stdout instead of a file.
    let mut counter = Task::command("wc -w file.txt");
    counter.set_inputs(&["file.txt"]).expect("error setting inputs");
    counter.set_outputs(&[STDOUT]).expect("error setting outputs");

    let counted = client
        .submit(&counter, task_args![joined])
        .result()
        .expect("count task failed")
        .remove(0)
        .into_stdout()
        .expect("expected a stdout output");
    print!("counted: {}", counted);
}
