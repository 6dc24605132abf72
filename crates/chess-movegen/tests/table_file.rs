//! Installing the process-wide attack tables from a data file.
//!
//! Kept to a single test: the tables can be installed once per process.

use chess_movegen::{
    init_attack_tables, perft, AttackTables, Board, Slider, TableError, TableSource,
};

#[test]
fn tables_load_from_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attacks.bin");
    let generated = AttackTables::generate().unwrap();
    generated.store(&path).unwrap();

    let installed = init_attack_tables(TableSource::File(path.clone())).unwrap();
    for slider in Slider::ALL {
        assert_eq!(installed.entries(slider), generated.entries(slider));
    }

    assert!(matches!(
        init_attack_tables(TableSource::File(path)),
        Err(TableError::AlreadyInitialized)
    ));
    assert!(matches!(
        init_attack_tables(TableSource::Generate),
        Err(TableError::AlreadyInitialized)
    ));

    assert_eq!(perft(&mut Board::new_initial(), 3), 8_902);
}
