pub mod sis;
