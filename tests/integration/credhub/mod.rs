mod find_all_test;
