pub mod board_utils;
