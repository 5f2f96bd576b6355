pub mod rsync;
