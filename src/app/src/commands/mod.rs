pub mod rtdb;
