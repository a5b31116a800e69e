mod product_tests;
