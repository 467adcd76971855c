use crate::test_helpers::factory::Factory;

#[test]
fn test_input_file_factory() {
    let files = Factory::input_files()
        .with_base("ttbar")
        .with_first_index(3)
        .with_sizes(&[10, 20])
        .create();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "ttbar_3.root");
    assert_eq!(files[0].sequence_index, 3);
    assert_eq!(files[1].name, "ttbar_4.root");
    assert_eq!(files[1].size, 20);
}
