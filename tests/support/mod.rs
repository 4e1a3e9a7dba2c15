pub mod auralearn_env;
