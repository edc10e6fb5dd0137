mod key_manager_tests;
