pub mod mpi_mock;
