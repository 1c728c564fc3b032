pub mod cyber_controller_error;
